//! Client-side error types.

use thiserror::Error;

/// Errors surfaced by the registry client and the control loops.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The registry could not be reached at all (network failure, timeout)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The registry answered with an error status and body
    #[error("Registry rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the registry
        status: reqwest::StatusCode,
        /// The `message` field of the error body, when one was sent
        message: String,
    },
}

impl ClientError {
    /// True when retrying on the next natural update could succeed.
    ///
    /// Transport failures are transient by definition; a rejection means
    /// the payload itself must change first.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
