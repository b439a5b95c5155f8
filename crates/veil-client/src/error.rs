//! Error types for talking to the redaction service.

use thiserror::Error;

/// Errors that can occur while calling the redaction service.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The service answered with a non-2xx status
    #[error("HTTP {status} {reason}{}", body_suffix(.body))]
    Http {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status, empty if unknown
        reason: String,
        /// Diagnostic body text, empty if none could be read
        body: String,
    },

    /// Transport-level failure (connect, TLS, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The status endpoint returned a body that is not JSON
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request was superseded and its cancellation token fired
    #[error("request cancelled")]
    Cancelled,

    /// The HTTP client could not be constructed
    #[error("client error: {0}")]
    Client(String),
}

impl ClientError {
    /// Whether this error only signals supersession rather than a failure.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" — {body}")
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
