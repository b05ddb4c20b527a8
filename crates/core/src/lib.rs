//! Bagan Baskets Core - Shared types library.
//!
//! This crate provides common types used across all Bagan Baskets components:
//! - `server` - JSON API for catalog browsing and order history
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Database encode/decode impls are available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, SKUs,
//!   and the order lifecycle status machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
