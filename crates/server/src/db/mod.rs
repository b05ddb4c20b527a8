//! Database operations for the storefront `PostgreSQL`.
//!
//! ## Tables
//!
//! - `users` - customer identities from the external identity gateway
//! - `products` - the catalog
//! - `orders` - order headers
//! - `order_items` - order line items (prices snapshotted at order time)
//!
//! ## The store handle
//!
//! All repositories go through [`Store`], a capability object wrapping a
//! lazily-created connection pool. The database URL is optional: with no
//! URL configured the handle never connects, reads degrade to empty
//! results, and writes fail with [`StoreError::Unavailable`]. The first
//! connection attempt is single-flight - concurrent first requests share
//! one initialization and the pool is reused afterwards.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p bagan-baskets-cli -- migrate
//! ```

pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tokio::sync::OnceCell;

pub use orders::OrderStore;
pub use products::CatalogStore;
pub use users::UserStore;

/// Errors that can occur during store operations.
///
/// Absence is never an error here - lookups return `Option`/empty `Vec`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Malformed or constraint-violating input; the caller's fault.
    #[error("validation error: {0}")]
    Validation(String),

    /// Uniqueness violation (e.g., duplicate SKU).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backing store is unconfigured or unreachable. Reads degrade to
    /// empty results; writes surface this to the caller.
    #[error("store unavailable")]
    Unavailable,
}

impl StoreError {
    /// Reclassify connection-level failures as unavailability.
    ///
    /// Pool acquire timeouts and connect errors mean the store is down, not
    /// that the statement was wrong.
    #[must_use]
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Unavailable
            }
            other => Self::Database(other),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Lazily-initialized, possibly-absent database handle.
///
/// Modeled as an explicit optional resource rather than a process-wide
/// mutable global: construct one from configuration, share it through
/// application state, and ask it for a pool per operation.
#[derive(Debug)]
pub struct Store {
    url: Option<SecretString>,
    pool: OnceCell<PgPool>,
}

impl Store {
    /// Create a store handle from an optional database URL.
    ///
    /// No connection is attempted until the first [`Self::pool`] call.
    #[must_use]
    pub const fn new(url: Option<SecretString>) -> Self {
        Self {
            url,
            pool: OnceCell::const_new(),
        }
    }

    /// Whether a database URL was configured at all.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Get the connection pool, connecting on first use.
    ///
    /// Returns `None` when the store is unconfigured or the connection
    /// attempt fails. A failed attempt is not cached: a later call retries,
    /// so a database that comes up after boot is picked up without a
    /// restart. Concurrent first calls share a single connection attempt.
    pub async fn pool(&self) -> Option<&PgPool> {
        let url = self.url.as_ref()?;

        match self.pool.get_or_try_init(|| create_pool(url)).await {
            Ok(pool) => Some(pool),
            Err(error) => {
                tracing::warn!(%error, "database unavailable");
                None
            }
        }
    }
}

/// Degrade a read-path failure: unavailability becomes the empty value,
/// anything else propagates.
pub(crate) fn degrade_read<T>(err: sqlx::Error, empty: T) -> Result<T, StoreError> {
    match StoreError::from_sqlx(err) {
        StoreError::Unavailable => {
            tracing::warn!("store unavailable mid-read, degrading to empty result");
            Ok(empty)
        }
        other => Err(other),
    }
}
