//! # LiveTrack Client
//!
//! Client-side control loops for the LiveTrack registry:
//!
//! - **Reporting agent**: owns one continuous position subscription and
//!   forwards every fix to the registry under its tracking identifier,
//!   sending a best-effort stop report when the session ends.
//! - **Observer loop**: polls the active-tracker listing on a fixed
//!   cadence and keeps the last good snapshot across failed polls.
//!
//! Both loops talk to the registry through [`RegistryClient`], a thin
//! `reqwest` wrapper over the two REST operations. A failed call never
//! crashes a loop: the agent skips to the next fix, the observer flags a
//! transient error and polls again.

#![warn(missing_docs)]

pub mod agent;
pub mod error;
pub mod http;
pub mod observer;
pub mod position;

pub use agent::{AgentConfig, ReportingAgent};
pub use error::ClientError;
pub use http::{ActiveTracker, RegistryClient, StoredRecord};
pub use observer::{Observer, ObserverConfig, ObserverHandle};
pub use position::{PositionError, PositionFix, PositionSource, SimulatedRoute};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
