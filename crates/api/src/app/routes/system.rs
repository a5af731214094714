use axum::Json;
use axum::response::IntoResponse;

/// Unauthenticated liveness probe.
pub async fn ping() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "pong" }))
}
