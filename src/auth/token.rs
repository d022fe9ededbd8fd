//! Session token issue and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// How long an issued token stays valid. Expiry is the only invalidation
/// mechanism; there is no revocation.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // account id
    pub exp: i64,
    pub iat: i64,
}

/// Why a token was rejected. Every variant maps to the same generic 401 at
/// the HTTP boundary; the distinction exists for logging and tests.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

/// Symmetric signing key, fixed for the process lifetime and shared by the
/// issuer and every verifier.
#[derive(Clone)]
pub struct TokenKey {
    secret: String,
}

impl TokenKey {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Issues a signed token for `subject`, expiring [`TOKEN_TTL_HOURS`]
    /// from now.
    pub fn issue(&self, subject: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
            iat: now.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("token encode: {}", e)))?;
        Ok(token)
    }

    /// Verifies signature and expiry, returning the embedded subject id.
    /// The signature is checked before any claim is trusted; expiry is
    /// compared against the local wall clock with zero leeway.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Malformed)
    }
}
