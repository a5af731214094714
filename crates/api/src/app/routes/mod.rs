use axum::{Router, routing::get};

pub mod auth;
pub mod items;
pub mod orders;
pub mod reports;
pub mod suppliers;
pub mod system;

/// Router for all authenticated endpoints (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .route("/auth/me", get(auth::me))
        .nest("/items", items::router())
        .nest("/suppliers", suppliers::router())
        .nest("/purchase-orders", orders::router())
        .nest("/reports", reports::router())
}
