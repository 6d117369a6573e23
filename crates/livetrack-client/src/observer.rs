//! Observer loop: dashboard-side polling of the active-tracker listing.
//!
//! Polls on a fixed cadence starting immediately on activation. Every
//! successful response replaces the rendered set wholesale; a failed poll
//! keeps the previous snapshot on display, raises a transient error flag,
//! and the next scheduled poll proceeds regardless.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::http::{ActiveTracker, RegistryClient};

/// Configuration for the observer loop.
#[derive(Debug, Clone)]
pub struct ObserverConfig {
    /// Polling cadence (default: 3 s)
    pub poll_interval: Duration,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
        }
    }
}

/// State shared between the loop and its read-side handles.
#[derive(Debug, Default)]
struct ObserverState {
    trackers: Vec<ActiveTracker>,
    last_error: Option<String>,
    last_refreshed: Option<DateTime<Utc>>,
}

/// Read-side handle onto an observer's latest snapshot.
#[derive(Clone)]
pub struct ObserverHandle {
    state: Arc<RwLock<ObserverState>>,
}

impl ObserverHandle {
    /// The most recently fetched active set.
    ///
    /// After a failed poll this is still the last good snapshot, never an
    /// empty fallback.
    pub fn active_trackers(&self) -> Vec<ActiveTracker> {
        self.state.read().trackers.clone()
    }

    /// Transient error from the most recent poll, cleared on the next
    /// success.
    pub fn last_error(&self) -> Option<String> {
        self.state.read().last_error.clone()
    }

    /// When the snapshot was last refreshed successfully.
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.state.read().last_refreshed
    }
}

/// Polling loop over the registry's active-tracker listing.
pub struct Observer {
    client: RegistryClient,
    config: ObserverConfig,
    state: Arc<RwLock<ObserverState>>,
}

impl Observer {
    /// Create an observer with the given polling configuration.
    pub fn new(client: RegistryClient, config: ObserverConfig) -> Self {
        Self {
            client,
            config,
            state: Arc::new(RwLock::new(ObserverState::default())),
        }
    }

    /// Get a read-side handle valid for the observer's whole life.
    pub fn handle(&self) -> ObserverHandle {
        ObserverHandle {
            state: self.state.clone(),
        }
    }

    /// Poll until the shutdown signal fires.
    ///
    /// The first poll happens immediately on activation.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.poll_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.poll_once().await,
                _ = shutdown.changed() => break,
            }
        }

        tracing::debug!("Observer loop stopped");
    }

    /// One poll: replace the snapshot on success, flag and keep it on
    /// failure.
    pub async fn poll_once(&self) {
        match self.client.list_active().await {
            Ok(trackers) => {
                tracing::debug!(count = trackers.len(), "Refreshed active-tracker snapshot");
                let mut state = self.state.write();
                state.trackers = trackers;
                state.last_error = None;
                state.last_refreshed = Some(Utc::now());
            }
            Err(err) => {
                tracing::warn!(error = %err, "Poll failed; keeping last good snapshot");
                self.state.write().last_error = Some(err.to_string());
            }
        }
    }
}
