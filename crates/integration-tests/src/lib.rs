//! Integration tests for Bagan Baskets.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and apply migrations
//! cargo run -p bagan-baskets-cli -- migrate
//!
//! # Run the database-backed tests
//! cargo test -p bagan-baskets-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `store_catalog` - catalog store tests against a real database
//! - `store_orders` - order store tests against a real database
//! - `api_http` - HTTP tests against a running server
//!
//! All tests are `#[ignore]`d by default because they need external
//! infrastructure (`SHOP_DATABASE_URL`, or a running server for the HTTP
//! suite). Test data is keyed on fresh UUIDs so suites can run repeatedly
//! against the same database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::SecretString;
use uuid::Uuid;

use bagan_baskets_core::Sku;
use bagan_baskets_server::db::{Store, UserStore};
use bagan_baskets_server::models::{UpsertUser, User};

/// Store handle for `SHOP_DATABASE_URL`.
///
/// # Panics
///
/// Panics when the variable is unset; the database-backed tests cannot
/// run without it.
#[must_use]
pub fn test_store() -> Store {
    dotenvy::dotenv().ok();
    let url = std::env::var("SHOP_DATABASE_URL")
        .map(SecretString::from)
        .expect("SHOP_DATABASE_URL must be set for integration tests");
    Store::new(Some(url))
}

/// Base URL of the running server for the HTTP suite.
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("SHOP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A SKU that cannot collide across test runs.
///
/// # Panics
///
/// Panics if the generated SKU fails validation, which indicates a bug in
/// the helper itself.
#[must_use]
pub fn unique_sku(prefix: &str) -> Sku {
    Sku::parse(&format!("{prefix}-{}", Uuid::new_v4().simple())).expect("generated SKU is valid")
}

/// Create a fresh user for order tests, keyed on a random open id.
///
/// # Panics
///
/// Panics when the upsert fails; the caller's database is required.
pub async fn seed_test_user(store: &Store) -> User {
    let open_id = format!("test-{}", Uuid::new_v4());
    UserStore::new(store)
        .upsert(
            UpsertUser {
                open_id,
                name: Some("Integration Test".to_owned()),
                email: None,
                login_method: Some("test".to_owned()),
                role: None,
                last_signed_in: None,
            },
            None,
        )
        .await
        .expect("failed to seed test user")
}
