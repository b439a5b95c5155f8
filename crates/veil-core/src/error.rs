//! Core error types for the Veil client.
//!
//! Domain parsing errors and configuration errors.

use thiserror::Error;

/// Errors from parsing the shared domain types.
#[derive(Error, Debug)]
pub enum VeilError {
    /// Unknown redaction method or output format name
    #[error("unknown {kind}: {value}")]
    UnknownVariant {
        /// What was being parsed ("method", "output format")
        kind: &'static str,
        /// The rejected input
        value: String,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
