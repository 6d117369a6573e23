//! Periodic eviction sweep.
//!
//! The sweep runs as a dedicated tokio task on a fixed interval, independent
//! of request traffic, and is shut down through its handle when the service
//! exits. Each tick runs one eviction pass against the shared registry.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::registry::LocationRegistry;

/// Handle to a running eviction sweeper.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) leaves
/// the task running for the life of the process; the server calls
/// `shutdown()` after the HTTP listener drains.
pub struct SweepHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Signal the sweeper to stop and wait for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }

    /// Whether the sweeper task has already finished.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn the eviction sweeper for `registry` at its configured cadence.
pub fn spawn(registry: LocationRegistry) -> SweepHandle {
    let interval = registry.config().sweep_interval;
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Skip the immediate first tick; a fresh registry has nothing to evict.
        ticker.tick().await;
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(interval_secs = interval.as_secs(), "Eviction sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let evicted = registry.sweep_once();
                    if evicted > 0 {
                        tracing::info!(evicted, remaining = registry.len(), "Eviction sweep removed stale trackers");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Eviction sweeper stopped");
    });

    SweepHandle { shutdown_tx, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryConfig;
    use chrono::Utc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_sweeper_evicts_stale_records() {
        let config = RegistryConfig::builder()
            .sweep_interval(Duration::from_millis(10))
            .build();
        let registry = LocationRegistry::new(config);

        // Backdate a stopped tracker well past the grace period
        let stale = Utc::now() - chrono::Duration::seconds(600);
        registry.report_at("gone", 0.0, 0.0, false, stale).unwrap();
        registry.report("alive", 1.0, 1.0, true).unwrap();

        let sweeper = spawn(registry.clone());
        tokio::time::sleep(Duration::from_millis(80)).await;
        sweeper.shutdown().await;

        assert!(registry.get("gone").is_none());
        assert!(registry.get("alive").is_some());
    }

    #[tokio::test]
    async fn test_shutdown_stops_task() {
        let registry = LocationRegistry::new(RegistryConfig::default());
        let sweeper = spawn(registry);
        assert!(!sweeper.is_finished());
        sweeper.shutdown().await;
    }
}
