//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::GrievanceStore;
use crate::services::auth::AuthService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The store is a trait object so the same
/// router runs against `PostgreSQL` in production and memory in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Arc<dyn GrievanceStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<dyn GrievanceStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, store }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &dyn GrievanceStore {
        self.inner.store.as_ref()
    }

    /// Authentication service over this state's store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.store())
    }
}
