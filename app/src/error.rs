//! Error types for application commands.

use serde::Serialize;
use veil_client::ClientError;
use veil_core::{ConfigError, VeilError};
use veil_session::{SessionError, ValidationError};

/// Serializable error for frontend commands.
#[derive(Debug, Serialize)]
pub struct CommandError {
    /// Error code for frontend handling (e.g., "PERSONA_REQUIRED")
    pub code: String,
    /// User-friendly error message
    pub message: String,
    /// Optional debugging context
    pub details: Option<serde_json::Value>,
}

impl CommandError {
    /// Create a new command error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a command error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

/// Validation failures keep their user-facing text as the message.
impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        match err {
            ValidationError::NoFile => Self::new("NO_FILE", message),
            ValidationError::FileTooLarge { size, limit } => Self::with_details(
                "FILE_TOO_LARGE",
                message,
                serde_json::json!({ "size": size, "limit": limit }),
            ),
            ValidationError::PersonaRequired => Self::new("PERSONA_REQUIRED", message),
            ValidationError::ExternalApiUnavailable => {
                Self::new("EXTERNAL_API_UNAVAILABLE", message)
            }
            ValidationError::ExpandOutOfRange(_) => Self::new("EXPAND_OUT_OF_RANGE", message),
            ValidationError::StrengthOutOfRange(_) => {
                Self::new("STRENGTH_OUT_OF_RANGE", message)
            }
        }
    }
}

impl From<ClientError> for CommandError {
    fn from(err: ClientError) -> Self {
        let message = err.to_string();
        match err {
            ClientError::Http { status, .. } => Self::with_details(
                "HTTP_ERROR",
                message,
                serde_json::json!({ "status": status }),
            ),
            ClientError::Network(_) => Self::new("NETWORK_ERROR", message),
            ClientError::Parse(_) => Self::new("PARSE_ERROR", message),
            ClientError::Cancelled => Self::new("CANCELLED", message),
            ClientError::Client(_) => Self::new("CLIENT_ERROR", message),
        }
    }
}

impl From<SessionError> for CommandError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoPreview => Self::new("NO_PREVIEW", "No processed image to save"),
            SessionError::Io(e) => e.into(),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::new("CONFIG_ERROR", format!("Configuration error: {err}"))
    }
}

impl From<VeilError> for CommandError {
    fn from(err: VeilError) -> Self {
        match err {
            VeilError::UnknownVariant { kind, value } => Self::with_details(
                "UNKNOWN_VARIANT",
                format!("Unknown {kind}: {value}"),
                serde_json::json!({ "kind": kind, "value": value }),
            ),
        }
    }
}

/// Convert std::io::Error to CommandError.
impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        Self::new("FILESYSTEM_ERROR", format!("Filesystem error: {err}"))
    }
}
