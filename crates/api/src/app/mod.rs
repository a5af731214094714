//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: the injected dependencies (store handles + token service)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get, routing::post};
use tower::ServiceBuilder;

use greenerp_auth::TokenService;
use greenerp_infra::Stores;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests). The store handles and token service are injected, never
/// reached for as globals.
pub fn build_app(stores: Stores, tokens: Arc<TokenService>) -> Router {
    let auth_state = middleware::AuthState {
        tokens: tokens.clone(),
        users: stores.users.clone(),
    };

    let services = Arc::new(AppServices { stores, tokens });

    // Protected routes: bearer token required, current user resolved.
    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ))
            .layer(Extension(services.clone())),
    );

    // Login and one-time seeding are reachable without a token.
    let public = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/init-users", post(routes::auth::init_users))
        .layer(Extension(services));

    Router::new()
        .route("/ping", get(routes::system::ping))
        .nest("/api", protected.merge(public))
}
