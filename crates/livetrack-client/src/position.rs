//! Device position subscription.
//!
//! The agent owns exactly one [`PositionSource`] per tracking session and
//! pulls fixes from it for as long as the session lasts. The source is a
//! trait so the binary can run against a simulated route on machines with
//! no positioning hardware, mirroring how the sensing stack falls back to
//! a simulated data source.

use std::time::Duration;

use thiserror::Error;

/// A single position sample from the positioning subsystem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    /// Latitude in signed degrees
    pub latitude: f64,
    /// Longitude in signed degrees
    pub longitude: f64,
}

/// Errors from the positioning subsystem.
#[derive(Debug, Error)]
pub enum PositionError {
    /// No fix arrived within the acquisition timeout
    #[error("Position acquisition timed out after {timeout_secs}s")]
    Timeout {
        /// The timeout that elapsed
        timeout_secs: u64,
    },

    /// The subsystem failed outright
    #[error("Positioning unavailable: {message}")]
    Unavailable {
        /// Description of the failure
        message: String,
    },
}

/// Source of continuous position updates.
#[async_trait::async_trait]
pub trait PositionSource: Send {
    /// Wait for the next position fix.
    ///
    /// The agent bounds each call with its acquisition timeout; sources do
    /// not need their own.
    async fn next_fix(&mut self) -> Result<PositionFix, PositionError>;
}

/// Deterministic simulated route around a center point.
///
/// Produces one fix per `fix_interval`, tracing a slow loop whose shape
/// depends only on the tick counter, so repeated runs are reproducible.
pub struct SimulatedRoute {
    center_latitude: f64,
    center_longitude: f64,
    fix_interval: Duration,
    tick: u64,
}

impl SimulatedRoute {
    /// Radius of the simulated loop in degrees (~1 km at mid latitudes).
    const RADIUS_DEG: f64 = 0.01;

    /// Create a route circling `(latitude, longitude)`.
    pub fn new(latitude: f64, longitude: f64, fix_interval: Duration) -> Self {
        Self {
            center_latitude: latitude,
            center_longitude: longitude,
            fix_interval,
            tick: 0,
        }
    }

    fn fix_at(&self, tick: u64) -> PositionFix {
        let t = tick as f64 * 0.1;
        PositionFix {
            latitude: self.center_latitude + Self::RADIUS_DEG * (t * 0.3).sin(),
            longitude: self.center_longitude + Self::RADIUS_DEG * (t * 0.2).cos(),
        }
    }
}

#[async_trait::async_trait]
impl PositionSource for SimulatedRoute {
    async fn next_fix(&mut self) -> Result<PositionFix, PositionError> {
        tokio::time::sleep(self.fix_interval).await;
        self.tick += 1;
        Ok(self.fix_at(self.tick))
    }
}
