//! Error types for the MCS gateway client.
//!
//! Nothing is retried internally; every error propagates to the immediate
//! caller. The variants follow the failure points of a single request round
//! trip: local preparation, transport, status, decode.

use thiserror::Error;

/// Result type alias using `McsError`.
pub type Result<T> = std::result::Result<T, McsError>;

/// Main error type for all MCS gateway operations.
#[derive(Debug, Error)]
pub enum McsError {
    /// Local filesystem error (stat, read, directory walk).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Multipart body construction failed before anything was sent.
    #[error("multipart body error: {0}")]
    Multipart(String),

    /// Transport-level failure: connection refused, timeout, cancelled send.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The gateway answered with a non-success status code.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code returned by the gateway.
        status: u16,
        /// Response body text, as far as it could be read.
        body: String,
    },

    /// Response decode failure (malformed or truncated JSON).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response carried no content where content was required.
    #[error("empty response: {0}")]
    EmptyResponse(String),

    /// Invalid base URL or HTTP client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl McsError {
    /// Returns true if the error happened before any request left the host.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            McsError::Io(_) | McsError::Multipart(_) | McsError::Config(_)
        )
    }

    /// Returns true if this error came back from the network round trip.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            McsError::Http(_) | McsError::UnexpectedStatus { .. }
        )
    }
}
