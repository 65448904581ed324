//! Login, registration and current-user route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extract::{ApiForm, ApiJson};
use crate::middleware::Caller;
use crate::services::auth::{IssuedToken, Tier};
use crate::state::AppState;

/// Login form, posted URL-encoded by the storefront client.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// The caller's own account.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Exchange credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Json<IssuedToken>> {
    let issued = state.auth().login(&form.username, &form.password).await?;
    Ok(Json(issued))
}

/// Create a customer account and log it in.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Json<IssuedToken>> {
    let issued = state.auth().register(&body.username, &body.password).await?;
    Ok(Json(issued))
}

/// Who the bearer token belongs to.
pub async fn me(Caller(ctx): Caller) -> Result<Json<MeResponse>> {
    let user = ctx.require(Tier::Authenticated)?;
    Ok(Json(MeResponse {
        username: user.username.clone(),
        is_admin: user.is_admin,
    }))
}
