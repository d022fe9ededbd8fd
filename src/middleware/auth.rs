//! Request gate for bearer-protected routes.

use axum::http::header::AUTHORIZATION;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::http::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extractor: authenticated account id from a `Bearer` token.
///
/// Trusts the signature alone — no storage lookup — so a token keeps passing
/// until its expiry even if the account was deleted meanwhile. Every
/// rejection is the same generic 401; the concrete cause only reaches the
/// debug log.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser(pub Uuid);

#[axum::async_trait]
impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .ok_or_else(|| {
                debug!("rejected request: missing or malformed Authorization header");
                AppError::Unauthorized
            })?;
        let subject = state.token_key().verify(token).map_err(|e| {
            debug!(reason = %e, "rejected bearer token");
            AppError::Unauthorized
        })?;
        Ok(AuthUser(subject))
    }
}
