use std::sync::Arc;

use greenerp_auth::TokenService;
use greenerp_infra::Stores;

/// The dependencies every handler works against, constructed once at process
/// start and threaded through the router as an extension.
pub struct AppServices {
    pub stores: Stores,
    pub tokens: Arc<TokenService>,
}
