//! The location registry: a guarded map of tracker id to latest record.
//!
//! One registry instance exists per process, constructed at service start
//! and injected into the request-handling layer. All reads return owned
//! snapshot copies; the only destructive operation is the eviction pass.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::{TrackerRecord, TrackerSnapshot};
use crate::{RegistryError, Result};

/// Configuration for registry eviction behaviour.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Grace period before a tracker that explicitly stopped is evicted
    /// (default: 180 s)
    pub inactivity_timeout: Duration,
    /// Multiplier applied to `inactivity_timeout` for trackers that are
    /// still flagged as tracking but have gone silent (default: 5)
    pub abandoned_multiplier: u32,
    /// Cadence of the background eviction sweep (default: 10 s)
    pub sweep_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: Duration::from_secs(180),
            abandoned_multiplier: 5,
            sweep_interval: Duration::from_secs(10),
        }
    }
}

impl RegistryConfig {
    /// Create a new configuration builder
    pub fn builder() -> RegistryConfigBuilder {
        RegistryConfigBuilder::default()
    }

    /// Timeout after which a silent but still-tracking entry is presumed
    /// abandoned (crashed reporter, lost connectivity).
    pub fn abandoned_timeout(&self) -> Duration {
        self.inactivity_timeout * self.abandoned_multiplier
    }
}

/// Builder for RegistryConfig
#[derive(Debug, Default)]
pub struct RegistryConfigBuilder {
    config: RegistryConfig,
}

impl RegistryConfigBuilder {
    /// Set the stopped-tracker grace period
    pub fn inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.config.inactivity_timeout = timeout;
        self
    }

    /// Set the abandoned-tracker multiplier (clamped to at least 1)
    pub fn abandoned_multiplier(mut self, multiplier: u32) -> Self {
        self.config.abandoned_multiplier = multiplier.max(1);
        self
    }

    /// Set the sweep cadence
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    /// Build the configuration
    pub fn build(self) -> RegistryConfig {
        self.config
    }
}

/// Shared handle to the in-memory location registry.
///
/// Cloning is cheap; all clones observe the same map. Writers and the
/// eviction pass take the write lock only for the map mutation itself, and
/// no lock is held across an await point anywhere in the crate.
#[derive(Clone)]
pub struct LocationRegistry {
    inner: Arc<RegistryInner>,
}

/// Inner state (not cloned, shared via Arc).
struct RegistryInner {
    records: RwLock<HashMap<String, TrackerRecord>>,
    config: RegistryConfig,
}

impl LocationRegistry {
    /// Create an empty registry with the given configuration.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                records: RwLock::new(HashMap::new()),
                config,
            }),
        }
    }

    /// The configuration this registry was built with.
    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Insert or replace the record for `tracker_id`, stamping it with the
    /// current server time.
    ///
    /// Returns the post-write snapshot so the caller can confirm what was
    /// stored. Two racing reports for the same id are both accepted; the
    /// later one to commit wins, regardless of timestamp order.
    pub fn report(
        &self,
        tracker_id: &str,
        latitude: f64,
        longitude: f64,
        is_tracking: bool,
    ) -> Result<TrackerRecord> {
        self.report_at(tracker_id, latitude, longitude, is_tracking, Utc::now())
    }

    /// Snapshots of every record currently flagged as tracking.
    ///
    /// Iteration order carries no meaning. An empty registry (or one with
    /// only stopped trackers) yields an empty vec.
    pub fn list_active(&self) -> Vec<TrackerSnapshot> {
        self.inner
            .records
            .read()
            .iter()
            .filter(|(_, record)| record.is_tracking)
            .map(|(id, record)| TrackerSnapshot::from_record(id, record))
            .collect()
    }

    /// Point read of one tracker's latest record, active or not.
    pub fn get(&self, tracker_id: &str) -> Option<TrackerSnapshot> {
        self.inner
            .records
            .read()
            .get(tracker_id)
            .map(|record| TrackerSnapshot::from_record(tracker_id, record))
    }

    /// Run one eviction pass against the current server time.
    ///
    /// Returns the number of records removed. Idempotent: a pass over an
    /// already-clean map removes nothing.
    pub fn sweep_once(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    /// Number of records currently stored (active and stopped).
    pub fn len(&self) -> usize {
        self.inner.records.read().len()
    }

    /// Whether the registry holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.inner.records.read().is_empty()
    }

    /// Clock-injected write, used by [`report`](Self::report) and by tests
    /// that pin receipt times.
    pub(crate) fn report_at(
        &self,
        tracker_id: &str,
        latitude: f64,
        longitude: f64,
        is_tracking: bool,
        now: DateTime<Utc>,
    ) -> Result<TrackerRecord> {
        if tracker_id.is_empty() {
            return Err(RegistryError::validation("trackerId must not be empty"));
        }

        let record = TrackerRecord::new(latitude, longitude, is_tracking, now);
        self.inner
            .records
            .write()
            .insert(tracker_id.to_string(), record.clone());

        tracing::debug!(
            tracker_id = %tracker_id,
            latitude,
            longitude,
            is_tracking,
            "Stored location report"
        );

        Ok(record)
    }

    /// Clock-injected eviction pass.
    ///
    /// A record is evicted when either:
    /// 1. it stopped tracking and its age exceeds `inactivity_timeout`, or
    /// 2. it is still flagged as tracking and its age exceeds
    ///    `inactivity_timeout * abandoned_multiplier`.
    ///
    /// Both comparisons are strict: a record exactly at the boundary stays.
    pub(crate) fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let inactivity = self.inner.config.inactivity_timeout;
        let abandoned = self.inner.config.abandoned_timeout();

        let mut records = self.inner.records.write();
        let before = records.len();
        records.retain(|id, record| {
            let age = record.age(now);
            let expired = if record.is_tracking {
                age > chrono_duration(abandoned)
            } else {
                age > chrono_duration(inactivity)
            };
            if expired {
                tracing::debug!(
                    tracker_id = %id,
                    age_secs = age.num_seconds(),
                    is_tracking = record.is_tracking,
                    "Evicting stale tracker"
                );
            }
            !expired
        });
        before - records.len()
    }
}

fn chrono_duration(d: Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn registry() -> LocationRegistry {
        LocationRegistry::new(RegistryConfig::default())
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_config_builder() {
        let config = RegistryConfig::builder()
            .inactivity_timeout(Duration::from_secs(60))
            .abandoned_multiplier(3)
            .sweep_interval(Duration::from_secs(5))
            .build();

        assert_eq!(config.inactivity_timeout, Duration::from_secs(60));
        assert_eq!(config.abandoned_timeout(), Duration::from_secs(180));
        assert_eq!(config.sweep_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_multiplier_clamped_to_one() {
        let config = RegistryConfig::builder().abandoned_multiplier(0).build();
        assert_eq!(config.abandoned_multiplier, 1);
        assert_eq!(config.abandoned_timeout(), config.inactivity_timeout);
    }

    #[test]
    fn test_report_overwrites_in_place() {
        let reg = registry();
        reg.report_at("A", 10.0, 20.0, true, t0()).unwrap();
        let stored = reg
            .report_at("A", 11.0, 21.0, true, t0() + chrono::Duration::seconds(1))
            .unwrap();

        assert_eq!(stored.latitude, 11.0);
        assert_eq!(stored.longitude, 21.0);
        assert_eq!(reg.len(), 1);

        let active = reg.list_active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].tracker_id, "A");
        assert_eq!(active[0].latitude, 11.0);
    }

    #[test]
    fn test_empty_tracker_id_rejected() {
        let reg = registry();
        let err = reg.report("", 1.0, 2.0, true).unwrap_err();
        assert!(matches!(err, RegistryError::Validation { .. }));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_active_filter() {
        let reg = registry();
        reg.report_at("walking", 1.0, 1.0, true, t0()).unwrap();
        reg.report_at("stopped", 2.0, 2.0, false, t0()).unwrap();
        reg.report_at("driving", 3.0, 3.0, true, t0()).unwrap();

        let mut ids: Vec<_> = reg
            .list_active()
            .into_iter()
            .map(|s| s.tracker_id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["driving", "walking"]);

        // The stopped record is still retrievable until evicted
        let stopped = reg.get("stopped").unwrap();
        assert!(!stopped.is_tracking);
    }

    #[test]
    fn test_stop_then_grace_period_eviction() {
        let reg = registry();
        reg.report_at("B", 0.0, 0.0, false, t0()).unwrap();

        // One second under the 180 s grace period: kept
        assert_eq!(reg.sweep_at(t0() + chrono::Duration::seconds(179)), 0);
        assert!(reg.get("B").is_some());

        // One second over: gone
        assert_eq!(reg.sweep_at(t0() + chrono::Duration::seconds(181)), 1);
        assert!(reg.get("B").is_none());
    }

    #[test]
    fn test_tracking_abandonment_grace() {
        let reg = registry();
        reg.report_at("C", 0.0, 0.0, true, t0()).unwrap();

        assert_eq!(reg.sweep_at(t0() + chrono::Duration::seconds(899)), 0);
        assert!(reg.get("C").is_some());

        assert_eq!(reg.sweep_at(t0() + chrono::Duration::seconds(901)), 1);
        assert!(reg.get("C").is_none());
    }

    #[test]
    fn test_boundary_is_strict() {
        let reg = registry();
        reg.report_at("edge", 0.0, 0.0, false, t0()).unwrap();
        // Exactly at the timeout: age is not *greater than* the grace period
        assert_eq!(reg.sweep_at(t0() + chrono::Duration::seconds(180)), 0);
        assert!(reg.get("edge").is_some());
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let reg = registry();
        reg.report_at("D", 0.0, 0.0, false, t0()).unwrap();

        let late = t0() + chrono::Duration::seconds(600);
        assert_eq!(reg.sweep_at(late), 1);
        assert_eq!(reg.sweep_at(late), 0);
        assert_eq!(reg.sweep_at(late), 0);
    }

    #[test]
    fn test_empty_state_listing() {
        let reg = registry();
        assert!(reg.list_active().is_empty());

        reg.report_at("idle", 0.0, 0.0, false, t0()).unwrap();
        assert!(reg.list_active().is_empty());
    }

    #[test]
    fn test_fresh_report_revives_stale_entry() {
        let reg = registry();
        reg.report_at("E", 0.0, 0.0, false, t0()).unwrap();

        // A new report before the sweep fires replaces the stale record
        let later = t0() + chrono::Duration::seconds(170);
        reg.report_at("E", 5.0, 6.0, true, later).unwrap();

        assert_eq!(reg.sweep_at(t0() + chrono::Duration::seconds(200)), 0);
        let snap = reg.get("E").unwrap();
        assert!(snap.is_tracking);
        assert_eq!(snap.latitude, 5.0);
    }

    #[test]
    fn test_concurrent_reports_distinct_ids() {
        let reg = registry();
        let mut handles = Vec::new();

        for i in 0..16 {
            let reg = reg.clone();
            handles.push(std::thread::spawn(move || {
                let id = format!("tracker-{i}");
                for step in 0..50 {
                    reg.report(&id, i as f64, step as f64, true).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(reg.len(), 16);
        for i in 0..16 {
            let snap = reg.get(&format!("tracker-{i}")).unwrap();
            assert_eq!(snap.latitude, i as f64);
            assert_eq!(snap.longitude, 49.0);
        }
    }
}
