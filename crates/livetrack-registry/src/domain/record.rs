//! Tracker records and read-side snapshots.

use chrono::{DateTime, Utc};

/// Latest known state for one tracker.
///
/// The tracker id is the registry's map key, not part of the record; a
/// report confirmation echoes the record alone. Every report fully replaces
/// the previous record for its id.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerRecord {
    /// Latitude in signed degrees, as supplied by the positioning subsystem
    pub latitude: f64,
    /// Longitude in signed degrees, as supplied by the positioning subsystem
    pub longitude: f64,
    /// True while the reporter intends to keep sending updates
    pub is_tracking: bool,
    /// Server receipt time of the most recent report
    pub last_updated_at: DateTime<Utc>,
}

impl TrackerRecord {
    /// Create a record stamped with the given receipt time.
    pub fn new(
        latitude: f64,
        longitude: f64,
        is_tracking: bool,
        last_updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            is_tracking,
            last_updated_at,
        }
    }

    /// Age of this record relative to `now`.
    ///
    /// Clamps to zero if `last_updated_at` is in the future of `now`
    /// (racing writes may commit a fresher timestamp between reads).
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        (now - self.last_updated_at).max(chrono::Duration::zero())
    }
}

/// A read-side copy of one record, annotated with its tracker id.
///
/// This is the element type of the active listing; callers own the copy and
/// never hold a reference into the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSnapshot {
    /// Opaque tracker identifier (caller-supplied, unique map key)
    pub tracker_id: String,
    /// Latitude in signed degrees
    pub latitude: f64,
    /// Longitude in signed degrees
    pub longitude: f64,
    /// True while the reporter intends to keep sending updates
    pub is_tracking: bool,
    /// Server receipt time of the most recent report
    pub last_updated_at: DateTime<Utc>,
}

impl TrackerSnapshot {
    /// Build a snapshot from a map entry.
    pub fn from_record(tracker_id: &str, record: &TrackerRecord) -> Self {
        Self {
            tracker_id: tracker_id.to_string(),
            latitude: record.latitude,
            longitude: record.longitude,
            is_tracking: record.is_tracking,
            last_updated_at: record.last_updated_at,
        }
    }
}
