use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use greenerp_core::UserId;

use crate::claims::{Claims, TokenValidationError, validate_claims};
use crate::Role;

/// Fixed bearer-token lifetime.
const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to encode token")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Malformed token, wrong signature, or undecodable claims. Collapsed to
    /// a single variant so callers cannot leak which check failed.
    #[error("invalid token")]
    Invalid,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// HS256 bearer-token service.
///
/// Holds the signing secret and expiry policy; constructed once at process
/// start and passed explicitly to whatever needs to issue or verify tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        // The claim time window is validated by `validate_claims` (the claims
        // carry RFC 3339 datetimes, not the registered `exp` integer), so the
        // library-level exp check is disabled.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime: Duration::hours(TOKEN_LIFETIME_HOURS),
        }
    }

    /// Issue a signed token for a user, valid for the fixed lifetime.
    pub fn issue(
        &self,
        user_id: UserId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            role,
            issued_at: now,
            expires_at: now + self.lifetime,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Encode)
    }

    /// Verify a token's signature and time window, returning its claims.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::Invalid)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
