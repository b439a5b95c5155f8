//! The redaction service interface and its request/response types.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use veil_core::{CapabilityStatus, OutputFormat, RedactionMethod};

/// Response header carrying the security level the service applied.
pub const HEADER_SECURITY_LEVEL: &str = "x-security-level";

/// Response header naming the face detector the service used.
pub const HEADER_DETECTION_METHOD: &str = "x-detection-method";

/// Trait for redaction service backends.
///
/// Implementations must be thread-safe (Send + Sync) so a session can share
/// one backend between overlapping submissions.
#[async_trait]
pub trait RedactionApi: Send + Sync {
    /// Fetch the service's capability status.
    ///
    /// # Errors
    /// Returns error on non-2xx responses, transport failures, or a body that
    /// is not JSON.
    async fn security_status(&self) -> Result<CapabilityStatus>;

    /// Submit an image for redaction.
    ///
    /// Must return [`ClientError::Cancelled`](crate::ClientError::Cancelled)
    /// promptly once `cancel` fires.
    ///
    /// # Errors
    /// Returns error on non-2xx responses, transport failures, or cancellation.
    async fn redact_face_image(
        &self,
        request: RedactionRequest,
        cancel: CancellationToken,
    ) -> Result<RedactedImage>;

    /// Base URL this backend talks to.
    fn base_url(&self) -> &str;
}

/// One redaction submission: the image plus its query parameters.
#[derive(Debug, Clone)]
pub struct RedactionRequest {
    /// File name sent with the multipart part
    pub file_name: String,
    /// Raw image bytes
    pub bytes: Arc<[u8]>,
    /// Redaction algorithm
    pub method: RedactionMethod,
    /// Face box expansion ratio
    pub expand: f64,
    /// Effect strength
    pub strength: u32,
    /// Requested output format
    pub out_format: OutputFormat,
    /// Persona prompt, only meaningful for `replace_face`
    pub persona: Option<String>,
}

impl RedactionRequest {
    /// Query parameters in the order the service documents them.
    ///
    /// `persona` is included only for `replace_face`.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("method", self.method.as_str().to_string()),
            ("expand", format_expand(self.expand)),
            ("strength", self.strength.to_string()),
            ("out_format", self.out_format.as_str().to_string()),
        ];
        if self.method == RedactionMethod::ReplaceFace {
            if let Some(persona) = &self.persona {
                pairs.push(("persona", persona.clone()));
            }
        }
        pairs
    }
}

/// Render `expand` the way the slider shows it: at most two decimals, no
/// trailing zeros.
fn format_expand(expand: f64) -> String {
    let rounded = (expand * 100.0).round() / 100.0;
    rounded.to_string()
}

/// Metadata the service attaches to a successful response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Value of `x-security-level`
    pub security_level: Option<String>,
    /// Value of `x-detection-method`
    pub detector: Option<String>,
}

impl ResponseMetadata {
    /// Whether either header was present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.security_level.is_none() && self.detector.is_none()
    }
}

/// A processed image returned by the service.
#[derive(Debug, Clone)]
pub struct RedactedImage {
    /// Image bytes
    pub bytes: Vec<u8>,
    /// `Content-Type` of the response, if declared
    pub content_type: Option<String>,
    /// Metadata from the response headers
    pub metadata: ResponseMetadata,
}
