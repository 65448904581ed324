//! Core types for Rubel Woodworks.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod category;
pub mod id;
pub mod rating;
pub mod status;

pub use category::{Category, CategoryError};
pub use id::*;
pub use rating::{Rating, RatingError};
pub use status::{OrderStatus, OrderStatusError};
