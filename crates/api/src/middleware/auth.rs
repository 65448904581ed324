//! Authentication extractor.
//!
//! Turns the `Authorization: Bearer <token>` header into a
//! [`RequestContext`]. Handlers then pass the context to a service, which
//! applies the tier it needs.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::{AuthError, RequestContext};
use crate::state::AppState;

/// Extractor yielding the caller's request context.
///
/// A missing header gives an anonymous context. A header that is present
/// but malformed, carries an invalid or expired token, or names a deleted
/// account rejects the request with 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_orders(
///     State(state): State<AppState>,
///     Caller(ctx): Caller,
/// ) -> Result<Json<Vec<Order>>> {
///     Ok(Json(state.orders().list_mine(&ctx).await?))
/// }
/// ```
pub struct Caller(pub RequestContext);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let ctx = state.auth().resolve(token).await?;

        if let Some(user) = ctx.identity() {
            set_sentry_user(&user.id, &user.username);
            tracing::Span::current().record("user_id", user.id.as_i32());
        }

        Ok(Self(ctx))
    }
}

/// Pull the token out of an `Authorization` header, if there is one.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::InvalidToken)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    Ok(Some(token))
}
