//! API error types and HTTP status mapping.
//!
//! The registry never panics across the HTTP boundary; every handler
//! returns a typed result and this module turns the error arm into the
//! wire bodies the dashboard and reporters expect.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::RegistryError;

/// API error type that converts to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request data (400)
    #[error("{message}")]
    Validation {
        /// Human-readable description of the problem
        message: String,
    },

    /// Unsupported method on the route (405)
    #[error("Method {method} is not supported on /track-location.")]
    MethodNotAllowed {
        /// The rejected HTTP method
        method: String,
    },

    /// Unexpected failure inside the registry (500)
    #[error("Internal server error.")]
    Internal {
        /// Detail passed through in the response's `error` field
        detail: String,
    },
}

impl ApiError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Validation { message } => Self::Validation { message },
            RegistryError::Internal { message } => Self::Internal { detail: message },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        let body = match &self {
            ApiError::Internal { detail } => {
                tracing::error!(error = %detail, "API error");
                json!({ "message": message, "error": detail })
            }
            _ => {
                tracing::warn!(error = %self, "API error");
                json!({ "message": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
