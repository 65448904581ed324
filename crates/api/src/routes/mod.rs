//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                               - API banner
//! GET  /health                         - Liveness
//! GET  /health/ready                   - Readiness (store ping)
//! GET  /static/uploads/{file}          - Uploaded product images
//!
//! # Auth (rate limited)
//! POST /api/auth/login                 - Form login, returns bearer token
//! POST /api/auth/register              - JSON registration, returns bearer token
//! GET  /api/auth/me                    - Current account
//!
//! # Catalog
//! GET    /api/products                 - Product listing
//! POST   /api/products                 - Create (admin, multipart)
//! GET    /api/products/{id}            - Product detail
//! PUT    /api/products/{id}            - Partial update (admin, multipart)
//! DELETE /api/products/{id}            - Delete (admin)
//! GET    /api/products/{id}/reviews    - Approved reviews
//! GET    /api/products/{id}/rating     - Rating summary
//!
//! # Reviews
//! POST   /api/reviews                  - Review a product (authenticated)
//! GET    /api/admin/reviews            - Moderation queue (admin)
//! PUT    /api/admin/reviews/{id}       - Approve or hide (admin)
//! DELETE /api/admin/reviews/{id}       - Delete (admin)
//!
//! # Orders
//! POST   /api/orders                   - Checkout (guest or signed in)
//! GET    /api/orders                   - All orders (admin)
//! PUT    /api/orders/{id}              - Status change (admin)
//! DELETE /api/orders/{id}              - Delete (admin)
//! GET    /api/my-orders                - Caller's orders (authenticated)
//! GET    /api/stats                    - Dashboard totals (admin)
//!
//! # Users (admin)
//! GET/POST           /api/users
//! GET/PUT/DELETE     /api/users/{id}
//! ```

pub mod auth;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::middleware::RateLimiterLayer;
use crate::state::AppState;

/// `{"message": ...}` acknowledgement body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Create the auth routes router, optionally behind a rate limiter.
pub fn auth_routes(limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    let router = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/me", get(auth::me));

    match limiter {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

/// Create the product routes router.
pub fn product_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route("/{id}/reviews", get(reviews::for_product))
        .route("/{id}/rating", get(reviews::rating))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", put(orders::update_status).delete(orders::destroy))
}

/// Create the review moderation routes router.
pub fn review_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::moderation_queue))
        .route("/{id}", put(reviews::moderate).delete(reviews::destroy))
}

/// Create the user management routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::create))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::destroy),
        )
}

/// Create every route under `/api`.
pub fn api_routes(max_upload_bytes: usize, auth_limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes(auth_limiter))
        .nest("/products", product_routes(max_upload_bytes))
        .route("/reviews", post(reviews::create))
        .nest("/admin/reviews", review_admin_routes())
        .nest("/orders", order_routes())
        .route("/my-orders", get(orders::mine))
        .route("/stats", get(orders::stats))
        .nest("/users", user_routes())
}

/// Create all routes, including health checks and the API banner.
pub fn routes(max_upload_bytes: usize, auth_limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes(max_upload_bytes, auth_limiter))
}
