//! Reporting agent: one tracking session's control loop.
//!
//! On every position fix the agent reports fresh coordinates with the
//! tracking flag set; when the session ends for any reason it makes a
//! single best-effort report with the flag cleared so dashboards drop the
//! tracker promptly. A failed report is never retried in place: the next
//! fix supersedes it.

use std::time::Duration;

use tokio::sync::watch;

use crate::error::ClientError;
use crate::http::RegistryClient;
use crate::position::{PositionError, PositionSource};

/// Configuration for the reporting agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Maximum wait for a single position fix before the attempt counts as
    /// failed (default: 5 s)
    pub acquire_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Control loop that forwards position fixes to the registry under one
/// tracking identifier.
pub struct ReportingAgent<S> {
    client: RegistryClient,
    tracker_id: String,
    source: S,
    config: AgentConfig,
}

impl<S: PositionSource> ReportingAgent<S> {
    /// Create an agent with the default configuration.
    pub fn new(client: RegistryClient, tracker_id: impl Into<String>, source: S) -> Self {
        Self::with_config(client, tracker_id, source, AgentConfig::default())
    }

    /// Create an agent with a custom configuration.
    pub fn with_config(
        client: RegistryClient,
        tracker_id: impl Into<String>,
        source: S,
        config: AgentConfig,
    ) -> Self {
        Self {
            client,
            tracker_id: tracker_id.into(),
            source,
            config,
        }
    }

    /// The identifier this agent reports under.
    pub fn tracker_id(&self) -> &str {
        &self.tracker_id
    }

    /// Run the session until the shutdown signal fires or positioning
    /// fails.
    ///
    /// Either way the loop ends with one best-effort stop report. A
    /// positioning failure is returned to the caller so a UI can surface
    /// it; a failed *location report* is only logged and the loop keeps
    /// going.
    pub async fn run(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), PositionError> {
        tracing::info!(tracker_id = %self.tracker_id, "Tracking session started");

        let acquire_timeout = self.config.acquire_timeout;

        loop {
            let acquired = tokio::select! {
                acquired = tokio::time::timeout(acquire_timeout, self.source.next_fix()) => acquired,
                _ = shutdown.changed() => break,
            };

            match acquired {
                Err(_elapsed) => {
                    let timeout_secs = acquire_timeout.as_secs();
                    tracing::error!(
                        tracker_id = %self.tracker_id,
                        timeout_secs,
                        "Position acquisition timed out; deactivating session"
                    );
                    self.send_stop().await;
                    return Err(PositionError::Timeout { timeout_secs });
                }
                Ok(Err(err)) => {
                    tracing::error!(
                        tracker_id = %self.tracker_id,
                        error = %err,
                        "Positioning failed; deactivating session"
                    );
                    self.send_stop().await;
                    return Err(err);
                }
                Ok(Ok(fix)) => {
                    if let Err(err) = self
                        .client
                        .report(&self.tracker_id, fix.latitude, fix.longitude, true)
                        .await
                    {
                        self.log_report_failure(&err);
                    }
                }
            }
        }

        tracing::info!(tracker_id = %self.tracker_id, "Tracking session stopping");
        self.send_stop().await;
        Ok(())
    }

    /// Single bounded-attempt stop report.
    ///
    /// Coordinates are placeholders; only the cleared flag matters for the
    /// listing. Failure is observed but never escalated: there is no second
    /// chance to run teardown.
    async fn send_stop(&self) {
        match self.client.report(&self.tracker_id, 0.0, 0.0, false).await {
            Ok(_) => {
                tracing::info!(tracker_id = %self.tracker_id, "Stop report delivered");
            }
            Err(err) => {
                tracing::warn!(
                    tracker_id = %self.tracker_id,
                    error = %err,
                    "Failed to deliver stop report; tracker will age out via eviction"
                );
            }
        }
    }

    fn log_report_failure(&self, err: &ClientError) {
        if err.is_transient() {
            tracing::warn!(
                tracker_id = %self.tracker_id,
                error = %err,
                "Report failed; will send again on the next position update"
            );
        } else {
            tracing::error!(
                tracker_id = %self.tracker_id,
                error = %err,
                "Registry rejected the report; payload must change before it can succeed"
            );
        }
    }
}
