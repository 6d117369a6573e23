//! HTTP client for the registry's two REST operations.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Default end-to-end timeout for a single registry call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client over `POST /track-location` and `GET /track-location`.
#[derive(Clone)]
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportBody<'a> {
    tracker_id: &'a str,
    latitude: f64,
    longitude: f64,
    is_tracking: bool,
}

/// Stored record echoed back by a successful report.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    /// Latitude as stored
    pub latitude: f64,
    /// Longitude as stored
    pub longitude: f64,
    /// Tracking flag as stored
    pub is_tracking: bool,
    /// Server receipt time, milliseconds since epoch
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated_at: DateTime<Utc>,
}

/// One element of the active-tracker listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTracker {
    /// Opaque tracker identifier
    pub tracker_id: String,
    /// Last reported latitude
    pub latitude: f64,
    /// Last reported longitude
    pub longitude: f64,
    /// Server receipt time, milliseconds since epoch
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_updated_at: DateTime<Utc>,
    /// Always true in the active listing
    pub is_tracking: bool,
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    #[allow(dead_code)]
    message: String,
    data: StoredRecord,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl RegistryClient {
    /// Create a client for the registry at `base_url`
    /// (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    /// Report a position sample for `tracker_id`.
    ///
    /// Returns the post-write snapshot the registry stored.
    pub async fn report(
        &self,
        tracker_id: &str,
        latitude: f64,
        longitude: f64,
        is_tracking: bool,
    ) -> Result<StoredRecord, ClientError> {
        let url = format!("{}/track-location", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ReportBody {
                tracker_id,
                latitude,
                longitude,
                is_tracking,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: ReportResponse = response.json().await?;
        Ok(body.data)
    }

    /// Fetch the full set of currently-active trackers.
    pub async fn list_active(&self) -> Result<Vec<ActiveTracker>, ClientError> {
        let url = format!("{}/track-location", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        Ok(response.json().await?)
    }

    async fn rejection(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| "no error body".to_string());
        ClientError::Rejected { status, message }
    }
}
