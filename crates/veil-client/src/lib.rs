//! Veil Client - HTTP access to the remote face-redaction service.
//!
//! The service exposes two endpoints:
//!
//! ```text
//! GET  {base}/security/status          -> { current_level?, external_api_enabled? }
//! POST {base}/redact/face_image?query  -> processed image bytes
//!      multipart field "file"             + x-security-level / x-detection-method
//! ```
//!
//! [`RedactionApi`] is the seam the session layer talks to; [`HttpRedactionApi`]
//! implements it with reqwest. Submissions carry a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) and the in-flight
//! request is dropped as soon as the token fires.
//!
//! # Example
//!
//! ```rust,no_run
//! use veil_client::{probe_capabilities, HttpRedactionApi};
//! use veil_core::ApiConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpRedactionApi::new(&ApiConfig::default())?;
//! let status = probe_capabilities(&api).await;
//! println!("external API enabled: {}", status.external_api_enabled);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod api;
pub mod error;
pub mod http;
pub mod probe;

pub use api::{RedactedImage, RedactionApi, RedactionRequest, ResponseMetadata};
pub use error::{ClientError, Result};
pub use http::HttpRedactionApi;
pub use probe::{probe_capabilities, status_from_json};
