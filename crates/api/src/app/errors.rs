use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use greenerp_core::DomainError;
use greenerp_infra::StoreError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Missing => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::Database(e) => {
            tracing::error!(error = %e, "store operation failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "storage failure",
            )
        }
    }
}
