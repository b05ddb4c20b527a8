//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOP_DATABASE_URL` - `PostgreSQL` connection string. When unset the
//!   server boots in degraded mode: catalog reads return empty results and
//!   writes fail with a store-unavailable error. This is deliberate - local
//!   tooling and smoke tests must run without a database.
//! - `SHOP_OWNER_OPEN_ID` - external identity of the store owner; a user
//!   signing in with this identity is promoted to admin on upsert
//! - `SHOP_GATEWAY_SECRET` - shared secret the identity gateway must
//!   present on `POST /api/auth/session`. When unset the assertion
//!   endpoint is open, which is only acceptable for local development
//! - `SHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOP_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `PostgreSQL` connection URL (contains password). `None` means the
    /// store is unconfigured and the server runs degraded.
    pub database_url: Option<SecretString>,
    /// External identity of the store owner, promoted to admin on sign-in.
    pub owner_open_id: Option<String>,
    /// Shared secret the identity gateway presents when asserting a
    /// sign-in. `None` leaves the assertion endpoint open (local dev only).
    pub gateway_secret: Option<SecretString>,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Sentry environment name.
    pub sentry_environment: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present. A
    /// missing `SHOP_DATABASE_URL` is not an error; the server serves
    /// degraded (startup logs the warning once tracing is up).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a present variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = std::env::var("SHOP_DATABASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .map(SecretString::from);

        let owner_open_id = std::env::var("SHOP_OWNER_OPEN_ID")
            .ok()
            .filter(|s| !s.is_empty());

        let gateway_secret = std::env::var("SHOP_GATEWAY_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .map(SecretString::from);

        let host = match std::env::var("SHOP_HOST") {
            Ok(raw) => raw
                .parse::<IpAddr>()
                .map_err(|e| ConfigError::InvalidEnvVar("SHOP_HOST".to_owned(), e.to_string()))?,
            Err(_) => IpAddr::from([127, 0, 0, 1]),
        };

        let port = match std::env::var("SHOP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar("SHOP_PORT".to_owned(), e.to_string()))?,
            Err(_) => 3000,
        };

        let sentry_dsn = std::env::var("SENTRY_DSN").ok().filter(|s| !s.is_empty());
        let sentry_environment = std::env::var("SENTRY_ENVIRONMENT")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            database_url,
            owner_open_id,
            gateway_secret,
            host,
            port,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// The socket address to bind the listener to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// A configuration with no store and no owner, for tests.
    #[cfg(test)]
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            database_url: None,
            owner_open_id: None,
            gateway_secret: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}
