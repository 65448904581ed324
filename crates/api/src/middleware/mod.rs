//! HTTP middleware and extractors for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction per route)
//! 2. `TraceLayer` (request span with `request_id`/`user_id` fields)
//! 3. Request ID (reuse or generate, echo on the response)
//! 4. CORS
//! 5. Rate limiting on `/auth/*` (governor)
//!
//! Authentication is not a layer: handlers that need the caller take the
//! [`Caller`] extractor and hand its context to a service.

pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::Caller;
pub use rate_limit::{RateLimiterLayer, auth_rate_limiter};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
