use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role tag carried by every user account.
///
/// The system knows exactly these three roles; the permission table in
/// [`crate::permissions`] maps them to allowed operations. A closed enum
/// (rather than a free string) makes an out-of-range role unrepresentable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ProcurementManager,
    SustainabilityManager,
}

impl Role {
    pub const ALL: [Role; 3] = [
        Role::Admin,
        Role::ProcurementManager,
        Role::SustainabilityManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::ProcurementManager => "procurement_manager",
            Role::SustainabilityManager => "sustainability_manager",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "procurement_manager" => Ok(Role::ProcurementManager),
            "sustainability_manager" => Ok(Role::SustainabilityManager),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
