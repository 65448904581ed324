//! Rubel Woodworks API library.
//!
//! The storefront and back-office HTTP API as a library, so the binary, the
//! CLI and the integration tests share one router and one set of services.
//!
//! # Layers
//!
//! - [`db`] - Store traits with `PostgreSQL` and in-memory implementations
//! - [`services`] - Credentials, tokens, authorization and the workflows
//! - [`routes`] - Thin axum handlers over the services
//! - [`middleware`] - Caller extraction, request IDs, rate limiting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod uploads;

use axum::{Router, http::HeaderValue};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    normalize_path::NormalizePath,
    services::ServeDir,
    trace::TraceLayer,
};

use middleware::RateLimiterLayer;
use state::AppState;

/// The served application: the router behind trailing-slash normalization.
pub type App = NormalizePath<Router>;

/// Build the complete application.
///
/// `auth_limiter` guards `/api/auth/*`; the binary passes
/// [`middleware::auth_rate_limiter`], tests pass `None`. Paths are matched
/// with any trailing slash removed, so `/api/users/` reaches `/api/users`.
pub fn app(state: AppState, auth_limiter: Option<RateLimiterLayer>) -> App {
    NormalizePath::trim_trailing_slash(router(state, auth_limiter))
}

fn router(state: AppState, auth_limiter: Option<RateLimiterLayer>) -> Router {
    let config = state.config();
    let uploads = ServeDir::new(state.images().root());

    routes::routes(config.max_upload_bytes, auth_limiter)
        .nest_service("/static/uploads", uploads)
        .layer(cors_layer(&config.allowed_origins))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// CORS for the storefront client. An empty origin list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
