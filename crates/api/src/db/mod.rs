//! Persistence for the API.
//!
//! # Database
//!
//! ## Tables
//!
//! - `users` - Site accounts (unique username, argon2 hash, admin flag)
//! - `products` - Catalog with bilingual text and an image reference
//! - `orders` - Guest and account orders with an opaque `items` payload
//! - `reviews` - One review per (product, user); cascades with its product
//!
//! Uniqueness of usernames and of (product, user) reviews is enforced by
//! table constraints. A violation surfaces as [`RepositoryError::Conflict`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p rubel-woodworks-cli -- migrate
//! ```
//!
//! # Stores
//!
//! Services talk to the traits below rather than to `PgPool` directly.
//! [`Stores::postgres`] wires the `sqlx` repositories; with the `test-util`
//! feature [`Stores::in_memory`] wires an in-memory store that enforces the
//! same constraints.

#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use rubel_woodworks_core::{OrderId, OrderStatus, ProductId, ReviewId, UserId};

use crate::models::{
    NewOrder, NewProduct, NewReview, NewUser, Order, OrderStats, Product, ProductChanges, Review,
    ReviewWithAuthor, User, UserChanges,
};

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Classify a failed write.
///
/// Unique violations become `Conflict`, foreign key violations become
/// `NotFound` (the referenced row vanished), anything else stays a
/// database error.
pub(crate) fn write_error(e: sqlx::Error, conflict: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(conflict.to_owned());
    }
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::NotFound;
    }
    RepositoryError::Database(e)
}

/// Account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get a user by ID.
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Get a user by exact username.
    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// Get a user together with their stored password hash.
    async fn get_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError>;

    /// List all users, oldest first.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Insert a user. `Conflict` if the username is taken.
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError>;

    /// Apply a partial update. `NotFound` if absent, `Conflict` if the new
    /// username is taken.
    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<User, RepositoryError>;

    /// Remove a user. `NotFound` if absent.
    async fn delete(&self, id: UserId) -> Result<(), RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Catalog storage.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// List all products, oldest first.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Get a product by ID.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product.
    async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError>;

    /// Replace the provided fields. `NotFound` if absent.
    async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Product, RepositoryError>;

    /// Remove a product and its reviews, returning the removed row.
    /// `NotFound` if absent.
    async fn delete(&self, id: ProductId) -> Result<Product, RepositoryError>;
}

/// Order storage.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert an order with status `pending`.
    async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError>;

    /// All orders, newest first.
    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Orders owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError>;

    /// Overwrite an order's status. `NotFound` if absent.
    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError>;

    /// Remove an order. `NotFound` if absent.
    async fn delete(&self, id: OrderId) -> Result<(), RepositoryError>;

    /// Dashboard aggregates, zero-filled on an empty store.
    async fn stats(&self) -> Result<OrderStats, RepositoryError>;
}

/// Review storage.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Insert a review. `Conflict` if the user already reviewed the product,
    /// `NotFound` if the product does not exist.
    async fn create(&self, review: &NewReview) -> Result<Review, RepositoryError>;

    /// Approved reviews of a product with author names, newest first.
    async fn list_approved(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ReviewWithAuthor>, RepositoryError>;

    /// Every review with author names, newest first.
    async fn list_all(&self) -> Result<Vec<ReviewWithAuthor>, RepositoryError>;

    /// Mean and count of a product's approved ratings. The mean is `None`
    /// when there are none.
    async fn rating_stats(
        &self,
        product_id: ProductId,
    ) -> Result<(Option<f64>, i64), RepositoryError>;

    /// Set the approval flag. `NotFound` if absent.
    async fn set_approval(
        &self,
        id: ReviewId,
        approved: bool,
    ) -> Result<ReviewWithAuthor, RepositoryError>;

    /// Remove a review. `NotFound` if absent.
    async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError>;
}

/// The four stores, shared by every service.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
    pub orders: Arc<dyn OrderStore>,
    pub reviews: Arc<dyn ReviewStore>,
}

impl Stores {
    /// Wire the `PostgreSQL` repositories over one connection pool.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            products: Arc::new(ProductRepository::new(pool.clone())),
            orders: Arc::new(OrderRepository::new(pool.clone())),
            reviews: Arc::new(ReviewRepository::new(pool)),
        }
    }

    /// Wire a fresh in-memory store.
    #[cfg(any(test, feature = "test-util"))]
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            users: store.clone(),
            products: store.clone(),
            orders: store.clone(),
            reviews: store,
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
