use chrono::{DateTime, Utc};

use greenerp_auth::Role;
use greenerp_core::UserId;

/// The authenticated user for a request.
///
/// Resolved from the bearer token by the auth middleware and injected as a
/// request extension; must be present for all protected routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    user_id: UserId,
    username: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl CurrentUser {
    pub fn new(
        user_id: UserId,
        username: String,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            username,
            role,
            created_at,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
