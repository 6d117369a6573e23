//! Data Transfer Objects for the registry REST API.
//!
//! The wire shape is camelCase with millisecond-epoch timestamps. Request
//! fields are optional at the serde layer so that field-presence validation
//! happens in the handler and maps to the API's own 400 body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{TrackerRecord, TrackerSnapshot};

/// Request body for `POST /track-location`.
///
/// ## Example
///
/// ```json
/// {
///   "trackerId": "PKG-1041",
///   "latitude": 52.2297,
///   "longitude": 21.0122,
///   "isTracking": true
/// }
/// ```
///
/// `userId` is accepted as a historical alias for `trackerId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLocationRequest {
    /// Opaque tracker identifier
    #[serde(default, alias = "userId")]
    pub tracker_id: Option<String>,
    /// Latitude in signed degrees
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in signed degrees
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Whether the reporter intends to keep sending updates
    #[serde(default)]
    pub is_tracking: Option<bool>,
}

/// Stored record echoed back on a successful report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerRecordDto {
    /// Latitude in signed degrees
    pub latitude: f64,
    /// Longitude in signed degrees
    pub longitude: f64,
    /// Whether the tracker counts as active for listings
    pub is_tracking: bool,
    /// Server receipt time, milliseconds since epoch
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated_at: DateTime<Utc>,
}

impl From<TrackerRecord> for TrackerRecordDto {
    fn from(record: TrackerRecord) -> Self {
        Self {
            latitude: record.latitude,
            longitude: record.longitude,
            is_tracking: record.is_tracking,
            last_updated_at: record.last_updated_at,
        }
    }
}

/// Response body for a successful `POST /track-location`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportLocationResponse {
    /// Human-readable confirmation
    pub message: String,
    /// Post-write snapshot of the stored record
    pub data: TrackerRecordDto,
}

/// One element of the `GET /track-location` listing.
///
/// ## Example Response
///
/// ```json
/// [
///   {
///     "trackerId": "PKG-1041",
///     "latitude": 52.2297,
///     "longitude": 21.0122,
///     "lastUpdatedAt": 1754000000000,
///     "isTracking": true
///   }
/// ]
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTrackerDto {
    /// Opaque tracker identifier
    pub tracker_id: String,
    /// Latitude in signed degrees
    pub latitude: f64,
    /// Longitude in signed degrees
    pub longitude: f64,
    /// Server receipt time, milliseconds since epoch
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated_at: DateTime<Utc>,
    /// Always true in the active listing
    pub is_tracking: bool,
}

impl From<TrackerSnapshot> for ActiveTrackerDto {
    fn from(snapshot: TrackerSnapshot) -> Self {
        Self {
            tracker_id: snapshot.tracker_id,
            latitude: snapshot.latitude,
            longitude: snapshot.longitude,
            last_updated_at: snapshot.last_updated_at,
            is_tracking: snapshot.is_tracking,
        }
    }
}
