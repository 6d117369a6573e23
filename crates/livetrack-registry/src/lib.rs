//! # LiveTrack Registry
//!
//! In-memory registry of "last known position per tracker" for live
//! location monitoring.
//!
//! Mobile reporters push position samples under an opaque tracking
//! identifier; dashboards poll the set of currently-active trackers. The
//! registry keeps exactly one record per tracker (last write wins), filters
//! listings to trackers that are still reporting, and evicts stale entries
//! on a periodic background sweep.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  livetrack-registry                  │
//! ├──────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌────────────────┐   ┌───────────┐   │
//! │  │  Domain  │   │    Registry    │   │   Sweep   │   │
//! │  │  (types) │   │ (guarded map)  │   │  (timer)  │   │
//! │  └────┬─────┘   └───────┬────────┘   └─────┬─────┘   │
//! │       └─────────────────┼──────────────────┘         │
//! │                         │                            │
//! │                ┌────────▼────────┐                   │
//! │                │    REST API     │                   │
//! │                │ (axum handlers) │                   │
//! │                └─────────────────┘                   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use livetrack_registry::{LocationRegistry, RegistryConfig, sweep};
//! use livetrack_registry::api::{create_router, AppState};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = LocationRegistry::new(RegistryConfig::default());
//!     let sweeper = sweep::spawn(registry.clone());
//!
//!     let app = create_router(AppState::new(registry));
//!     // ... serve with axum, then:
//!     sweeper.shutdown().await;
//! }
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod domain;
pub mod registry;
pub mod sweep;

pub use domain::{TrackerRecord, TrackerSnapshot};
pub use registry::{LocationRegistry, RegistryConfig, RegistryConfigBuilder};
pub use api::{create_router, AppState};
pub use sweep::SweepHandle;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Unified error type for registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A required input was missing or malformed
    #[error("Validation error: {message}")]
    Validation {
        /// Description of what validation failed
        message: String,
    },

    /// Unexpected failure inside the registry
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl RegistryError {
    /// Create a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
