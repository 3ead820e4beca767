//! Shared application state

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::ServerConfig;
use crate::status::ConnectionRegistry;

/// Shared state for HTTP and WebSocket handlers
pub struct AppState {
    /// Places and reviews
    pub catalog: Arc<Catalog>,

    /// Connected status clients and their broadcast task
    pub registry: Arc<ConnectionRegistry>,

    pub config: ServerConfig,
}

impl AppState {
    /// Create state with an empty catalog
    pub fn new(config: ServerConfig) -> Self {
        Self::with_catalog(Arc::new(Catalog::new()), config)
    }

    /// Create state around an existing catalog
    pub fn with_catalog(catalog: Arc<Catalog>, config: ServerConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new(config.status_interval));
        Self {
            catalog,
            registry,
            config,
        }
    }

    /// Number of connected status clients
    pub fn connected_clients(&self) -> usize {
        self.registry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_registry_uses_configured_interval() {
        let config = ServerConfig {
            status_interval: Duration::from_millis(250),
            ..ServerConfig::default()
        };
        let state = AppState::new(config);

        assert_eq!(state.registry.interval(), Duration::from_millis(250));
        assert_eq!(state.connected_clients(), 0);
        assert_eq!(state.catalog.place_count(), 0);
    }
}
