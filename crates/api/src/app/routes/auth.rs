use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use greenerp_auth::{Role, User, hash_password, verify_password};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

/// The three demo accounts, one per role.
const DEMO_USERS: [(&str, &str, Role); 3] = [
    ("admin", "admin123", Role::Admin),
    ("proc_mgr", "proc123", Role::ProcurementManager),
    ("sust_mgr", "sust123", Role::SustainabilityManager),
];

/// `POST /api/auth/login`
///
/// Unknown username and wrong password produce the same response, so a
/// caller cannot probe which usernames exist.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    if body.username.is_empty() || body.password.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "username and password are required",
        );
    }

    let user = match services.stores.users.by_username(&body.username).await {
        Ok(user) => user,
        Err(e) => return errors::store_error_to_response(e),
    };

    let Some(user) = user else {
        return invalid_credentials();
    };

    if !verify_password(&body.password, &user.password_hash) {
        return invalid_credentials();
    }

    let token = match services.tokens.issue(user.id, user.role, Utc::now()) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "failed to issue token");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                "failed to issue token",
            );
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "access_token": token,
            "role": user.role,
        })),
    )
        .into_response()
}

fn invalid_credentials() -> axum::response::Response {
    errors::json_error(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "invalid credentials",
    )
}

/// `POST /api/auth/init-users`
///
/// One-time bootstrap of the demo accounts; conflicts once any user exists.
pub async fn init_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let now = Utc::now();

    let mut users = Vec::with_capacity(DEMO_USERS.len());
    for (username, password, role) in DEMO_USERS {
        let password_hash = match hash_password(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!(error = %e, "failed to hash demo password");
                return errors::json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "hash_error",
                    "failed to hash password",
                );
            }
        };
        users.push(User::new(username, password_hash, role, now));
    }

    match services.stores.users.seed(users).await {
        Ok(()) => {
            tracing::info!("demo users created");
            (
                StatusCode::CREATED,
                Json(serde_json::json!({ "message": "users created" })),
            )
                .into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `GET /api/auth/me`
pub async fn me(Extension(user): Extension<CurrentUser>) -> axum::response::Response {
    (StatusCode::OK, Json(dto::current_user_to_json(&user))).into_response()
}
