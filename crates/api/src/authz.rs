//! API-side authorization guard.
//!
//! One function consults the permission table for the current user; routes
//! never compare roles directly.

use axum::http::StatusCode;

use greenerp_auth::{Operation, authorize};

use crate::app::errors;
use crate::context::CurrentUser;

/// Check that the current user may perform `operation`.
///
/// Returns the ready-to-send 403 response on denial so handlers can
/// early-return it.
pub fn require(user: &CurrentUser, operation: Operation) -> Result<(), axum::response::Response> {
    authorize(user.role(), operation)
        .map_err(|e| errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}
