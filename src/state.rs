//! Shared application state for Axum handlers.
//!
//! The state owns the product store for the lifetime of the server. Each
//! call to [`AppState::new`] creates an independent catalog, so tests can
//! run several isolated servers side by side.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::store::{InMemoryProductStore, ProductStore};

/// Shared application state for Axum handlers.
///
/// Cloned for each request; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Product catalog
    pub store: Arc<dyn ProductStore>,
    /// Application configuration
    pub config: Arc<Config>,
    /// Timestamp when the application started
    pub started_at: Instant,
}

impl AppState {
    /// Create state backed by a freshly seeded in-memory store.
    pub fn new(config: Config) -> Self {
        Self::with_store(Arc::new(InMemoryProductStore::seeded()), config)
    }

    /// Create state around an existing store.
    pub fn with_store(store: Arc<dyn ProductStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
