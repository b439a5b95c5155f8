//! Veil Core - Foundation crate for the Veil redaction client.
//!
//! This crate provides shared types, error handling, configuration management,
//! and the capability model that all other Veil crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Redaction methods, output formats and parameter domains
//! - [`capabilities`] - Remote capability status and the method options it gates
//!
//! # Example
//!
//! ```rust
//! use veil_core::{available_methods, AppConfig, CapabilityStatus, RedactionMethod};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
//!
//! let status = CapabilityStatus::fail_closed();
//! let options = available_methods(status.external_api_enabled);
//! assert!(options.iter().all(|o| o.method != RedactionMethod::ReplaceFace));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod capabilities;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use capabilities::{available_methods, CapabilityStatus, MethodOption};
pub use config::{ApiConfig, AppConfig, UploadConfig, DEFAULT_API_BASE};
pub use error::{ConfigError, ConfigResult, VeilError};
pub use types::{
    OutputFormat, RedactionMethod, EXPAND_MAX, EXPAND_MIN, MAX_UPLOAD_BYTES, STRENGTH_MAX,
    STRENGTH_MIN,
};
