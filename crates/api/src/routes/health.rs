//! Root, liveness and readiness handlers.

use axum::{Json, extract::State, http::StatusCode};

use super::MessageResponse;
use crate::state::AppState;

/// API banner.
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to Rubel Woodworks API"))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.stores().users.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
