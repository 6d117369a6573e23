//! Axum request handlers for the registry REST API.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::Method;
use axum::Json;

use super::dto::{ActiveTrackerDto, ReportLocationRequest, ReportLocationResponse};
use super::error::{ApiError, ApiResult};
use super::state::AppState;

const MISSING_FIELDS_MESSAGE: &str =
    "Missing trackerId, latitude, longitude, or isTracking in request body.";

/// Accept a position report and store it as the tracker's latest record.
///
/// Responds 200 with the post-write snapshot, 400 when any required field
/// is absent (state untouched), 500 on unexpected failure.
#[tracing::instrument(skip(state, payload))]
pub async fn report_location(
    State(state): State<AppState>,
    payload: Result<Json<ReportLocationRequest>, JsonRejection>,
) -> ApiResult<Json<ReportLocationResponse>> {
    let Json(request) = payload
        .map_err(|rejection| ApiError::validation(format!("Invalid request body: {}", rejection.body_text())))?;

    let (Some(tracker_id), Some(latitude), Some(longitude), Some(is_tracking)) = (
        request.tracker_id,
        request.latitude,
        request.longitude,
        request.is_tracking,
    ) else {
        return Err(ApiError::validation(MISSING_FIELDS_MESSAGE));
    };

    let record = state
        .registry()
        .report(&tracker_id, latitude, longitude, is_tracking)?;

    tracing::info!(
        tracker_id = %tracker_id,
        latitude,
        longitude,
        is_tracking,
        "Received location report"
    );

    Ok(Json(ReportLocationResponse {
        message: "Location received successfully".to_string(),
        data: record.into(),
    }))
}

/// List every tracker whose latest record is still flagged as tracking.
///
/// An empty registry yields an empty array, never an error.
#[tracing::instrument(skip(state))]
pub async fn list_active(State(state): State<AppState>) -> ApiResult<Json<Vec<ActiveTrackerDto>>> {
    let trackers: Vec<ActiveTrackerDto> = state
        .registry()
        .list_active()
        .into_iter()
        .map(Into::into)
        .collect();

    tracing::debug!(count = trackers.len(), "Listed active trackers");

    Ok(Json(trackers))
}

/// Fallback for unsupported methods on `/track-location`.
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
    }
}
