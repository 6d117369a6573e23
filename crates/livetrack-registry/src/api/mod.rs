//! REST surface for the location registry.
//!
//! ## Endpoints
//!
//! - `POST /track-location` - Report a tracker's position
//! - `GET /track-location` - List currently-active trackers
//!
//! Any other method on the path answers 405. Observers poll the listing;
//! the registry never pushes updates.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::get;
use axum::Router;

pub use dto::*;
pub use error::ApiError;
pub use state::AppState;

/// Create the registry API router.
///
/// # Example
///
/// ```rust,no_run
/// use livetrack_registry::{LocationRegistry, RegistryConfig};
/// use livetrack_registry::api::{create_router, AppState};
///
/// let registry = LocationRegistry::new(RegistryConfig::default());
/// let app = create_router(AppState::new(registry));
/// // ... serve with axum
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/track-location",
            get(handlers::list_active)
                .post(handlers::report_location)
                .fallback(handlers::method_not_allowed),
        )
        .with_state(state)
}
