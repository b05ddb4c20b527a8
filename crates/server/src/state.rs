//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to configuration and the
/// lazy store handle. The handle is the only path to the database, so an
/// unconfigured deployment degrades uniformly everywhere.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: Store,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let store = Store::new(config.database_url.clone());

        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get a reference to the lazy store handle.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }
}
