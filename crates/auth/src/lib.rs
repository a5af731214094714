//! `greenerp-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it models
//! roles, the permission table, JWT claims, the HS256 token service, and
//! password hashing. Resolving a token's subject to a stored user row is the
//! caller's job.

pub mod claims;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod token;
pub mod user;

pub use claims::{Claims, TokenValidationError, validate_claims};
pub use password::{hash_password, verify_password};
pub use permissions::{AuthzError, Operation, allowed_roles, authorize};
pub use roles::Role;
pub use token::{TokenError, TokenService};
pub use user::User;
