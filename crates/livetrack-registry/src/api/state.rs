//! Application state for the registry API.
//!
//! The registry instance is constructed at service start and injected here;
//! handlers never reach for a global.

use crate::registry::LocationRegistry;

/// Shared application state, cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    registry: LocationRegistry,
}

impl AppState {
    /// Wrap a registry handle for the request-handling layer.
    pub fn new(registry: LocationRegistry) -> Self {
        Self { registry }
    }

    /// The registry this API serves.
    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }
}
