//! Domain models for the API.
//!
//! These types are what the stores return and the services hand to routes.
//! They derive `sqlx::FromRow` so the Postgres store can decode rows straight
//! into them, and `Serialize` in the shape the storefront client reads.

pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use order::{NewOrder, Order, OrderStats};
pub use product::{NewProduct, Product, ProductChanges};
pub use review::{ANONYMOUS_REVIEWER, NewReview, RatingSummary, Review, ReviewView, ReviewWithAuthor};
pub use user::{NewUser, User, UserChanges};
