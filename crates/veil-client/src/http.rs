//! reqwest-backed implementation of [`RedactionApi`].

use crate::api::{
    RedactedImage, RedactionApi, RedactionRequest, ResponseMetadata, HEADER_DETECTION_METHOD,
    HEADER_SECURITY_LEVEL,
};
use crate::error::{ClientError, Result};
use crate::probe::status_from_json;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use veil_core::{ApiConfig, CapabilityStatus};

/// Redaction service reached over HTTP.
pub struct HttpRedactionApi {
    client: Client,
    base_url: String,
}

impl HttpRedactionApi {
    /// Create a client for the configured service.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Client(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.normalized_base().to_string(),
        })
    }

    /// Create a client for a service at `base_url` with no request timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&ApiConfig {
            base_url: base_url.into(),
            request_timeout_secs: None,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send_redaction(&self, request: RedactionRequest) -> Result<RedactedImage> {
        let query = request.query_pairs();
        let part = Part::bytes(request.bytes.to_vec()).file_name(request.file_name);
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("/redact/face_image"))
            .query(&query)
            .header(CACHE_CONTROL, "no-store")
            .multipart(form)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let metadata = metadata_from_headers(response.headers());
        let content_type = header_string(response.headers(), CONTENT_TYPE.as_str());
        let bytes = response.bytes().await?.to_vec();

        debug!(
            "Redaction response: {} bytes, level={:?}, detector={:?}",
            bytes.len(),
            metadata.security_level,
            metadata.detector
        );

        Ok(RedactedImage {
            bytes,
            content_type,
            metadata,
        })
    }
}

#[async_trait]
impl RedactionApi for HttpRedactionApi {
    async fn security_status(&self) -> Result<CapabilityStatus> {
        let response = self
            .client
            .get(self.endpoint("/security/status"))
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let text = response.text().await?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        Ok(status_from_json(&value))
    }

    async fn redact_face_image(
        &self,
        request: RedactionRequest,
        cancel: CancellationToken,
    ) -> Result<RedactedImage> {
        // Dropping the request future aborts the connection.
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ClientError::Cancelled),
            result = self.send_redaction(request) => result,
        }
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Turn a non-2xx response into [`ClientError::Http`], reading its body
/// best-effort.
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Http {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    })
}

fn metadata_from_headers(headers: &HeaderMap) -> ResponseMetadata {
    ResponseMetadata {
        security_level: header_string(headers, HEADER_SECURITY_LEVEL),
        detector: header_string(headers, HEADER_DETECTION_METHOD),
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_client_creation() {
        let api = HttpRedactionApi::new(&ApiConfig::default()).expect("create client");
        assert_eq!(api.base_url(), "http://127.0.0.1:8000");
        assert_eq!(
            api.endpoint("/security/status"),
            "http://127.0.0.1:8000/security/status"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let api = HttpRedactionApi::with_base_url("https://redact.example.com/").expect("create client");
        assert_eq!(
            api.endpoint("/redact/face_image"),
            "https://redact.example.com/redact/face_image"
        );
    }

    #[test]
    fn test_client_with_timeout() {
        let config = ApiConfig {
            base_url: "http://localhost:9000".to_string(),
            request_timeout_secs: Some(30),
        };
        assert!(HttpRedactionApi::new(&config).is_ok());
    }

    #[test]
    fn test_metadata_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_SECURITY_LEVEL, HeaderValue::from_static("high"));
        let meta = metadata_from_headers(&headers);
        assert_eq!(meta.security_level.as_deref(), Some("high"));
        assert_eq!(meta.detector, None);
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        // Nothing listens on port 9; the cancelled branch must win first.
        let api = HttpRedactionApi::with_base_url("http://127.0.0.1:9").expect("create client");
        let token = CancellationToken::new();
        token.cancel();

        let request = RedactionRequest {
            file_name: "a.png".to_string(),
            bytes: std::sync::Arc::from(&b"png"[..]),
            method: veil_core::RedactionMethod::Blur,
            expand: 0.1,
            strength: 8,
            out_format: veil_core::OutputFormat::Png,
            persona: None,
        };

        let err = api.redact_face_image(request, token).await.unwrap_err();
        assert!(err.is_cancelled());
    }
}
