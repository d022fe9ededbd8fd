//! Shared application state and liveness handler.

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::auth::TokenKey;
use crate::services::AccountService;

/// Shared state for all routes. The token key is the single process-wide
/// signing secret, injected here so the issuer and the gate agree.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub token_key: TokenKey,
}

impl AppState {
    pub fn account_service(&self) -> &AccountService {
        &self.account_service
    }
    pub fn token_key(&self) -> &TokenKey {
        &self.token_key
    }
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "roster" })),
    )
}
