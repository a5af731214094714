use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use greenerp_core::UserId;

use crate::Role;

/// A stored user account.
///
/// `password_hash` is an argon2 PHC string produced by
/// [`crate::password::hash_password`]; it never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            password_hash: password_hash.into(),
            role,
            created_at: now,
        }
    }
}
