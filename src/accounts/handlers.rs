//! Bearer-gated profile handlers.
//!
//! The gate checks the token, not ownership: any valid session may operate
//! on any account id.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::auth::AuthUser;
use crate::models::AccountResponse;

#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// GET /users/:id
pub async fn get_account(
    State(state): State<AppState>,
    AuthUser(_subject): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state.account_service().get_account(id).await?;
    info!(user_id = %id, "account retrieved");
    Ok(Json(account.into()))
}

/// PUT /users/:id
pub async fn update_account(
    State(state): State<AppState>,
    AuthUser(_subject): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state
        .account_service()
        .update_profile(id, &body.username, &body.email, body.password.as_deref())
        .await?;
    Ok(Json(account.into()))
}

/// DELETE /users/:id
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(_subject): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.account_service().delete_account(id).await?;
    Ok(Json(json!({ "message": "account deleted" })))
}
