//! Back-office user management route handlers.

use axum::{
    Json,
    extract::State,
};
use serde::Deserialize;

use rubel_woodworks_core::UserId;

use super::MessageResponse;
use crate::error::Result;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::Caller;
use crate::models::User;
use crate::services::users::UserUpdate;
use crate::state::AppState;

/// New account body.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Partial update body.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

pub async fn index(State(state): State<AppState>, Caller(ctx): Caller) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users().list(&ctx).await?))
}

pub async fn show(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<User>> {
    Ok(Json(state.users().get(&ctx, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<Json<User>> {
    let user = state
        .users()
        .create(&ctx, &body.username, &body.password, body.is_admin)
        .await?;
    Ok(Json(user))
}

pub async fn update(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<UserId>,
    ApiJson(body): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>> {
    let update = UserUpdate {
        username: body.username,
        password: body.password,
        is_admin: body.is_admin,
    };
    Ok(Json(state.users().update(&ctx, id, update).await?))
}

pub async fn destroy(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<MessageResponse>> {
    state.users().delete(&ctx, id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
