//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Credentials, tokens and the authorization gate
//! - `catalog` - Products and their images
//! - `orders` - Checkout, status lifecycle, dashboard stats
//! - `reviews` - Reviews, moderation, rating summaries
//! - `users` - Back-office account administration
//!
//! Services borrow their stores from [`crate::state::AppState`] for the
//! duration of one request. Each operation takes the caller's
//! [`auth::RequestContext`] and checks its tier first.

pub mod auth;
pub mod catalog;
pub mod orders;
pub mod reviews;
pub mod users;
