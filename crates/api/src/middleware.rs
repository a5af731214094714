use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use greenerp_auth::TokenService;
use greenerp_infra::UserStore;

use crate::app::errors;
use crate::context::CurrentUser;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
    pub users: Arc<dyn UserStore>,
}

/// Authenticate the request: verify the bearer token and resolve its subject
/// to a live user row. Missing/invalid/expired tokens and unresolvable
/// subjects all fail with the same 401.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers())?;

    let claims = state
        .tokens
        .verify(token, Utc::now())
        .map_err(|_| unauthenticated())?;

    let user = state
        .users
        .by_id(claims.sub)
        .await
        .map_err(errors::store_error_to_response)?
        .ok_or_else(unauthenticated)?;

    req.extensions_mut().insert(CurrentUser::new(
        user.id,
        user.username,
        user.role,
        user.created_at,
    ));

    Ok(next.run(req).await)
}

fn unauthenticated() -> Response {
    errors::json_error(
        StatusCode::UNAUTHORIZED,
        "unauthenticated",
        "a valid bearer token is required",
    )
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Response> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(unauthenticated)?;

    let header = header.to_str().map_err(|_| unauthenticated())?;

    let header = header.strip_prefix("Bearer ").ok_or_else(unauthenticated)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(unauthenticated());
    }

    Ok(token)
}
