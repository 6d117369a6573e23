//! Domain types for the location registry.
//!
//! - **Records**: the registry's stored value per tracker (last position,
//!   tracking flag, receipt time)
//! - **Snapshots**: immutable read-side copies annotated with the tracker id

pub mod record;

pub use record::*;
