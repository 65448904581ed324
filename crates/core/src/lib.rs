//! Rubel Woodworks Core - Shared domain types.
//!
//! This crate provides the types shared by every Rubel Woodworks component:
//! - `api` - The storefront and back-office HTTP API
//! - `cli` - Command-line tools for migrations and admin management
//!
//! # Architecture
//!
//! The core crate contains only types and their validation rules - no I/O,
//! no database access, no HTTP. The optional `postgres` feature adds `sqlx`
//! encode/decode implementations so the types can be bound directly in queries.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, the closed `Category`/`OrderStatus` sets and `Rating`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
