//! Integration tests for the HTTP client against a local axum server.
//!
//! Exercises the wire format (query string, multipart field, headers) and the
//! fail-closed capability probe.

use axum::extract::{Multipart, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use veil_client::{
    probe_capabilities, ClientError, HttpRedactionApi, RedactionApi, RedactionRequest,
};
use veil_core::{OutputFormat, RedactionMethod};

const PNG_BODY: &[u8] = b"\x89PNG\r\n\x1a\nredacted";

#[derive(Debug, Clone, Default)]
struct Captured {
    query: HashMap<String, String>,
    file_name: Option<String>,
    file_bytes: Vec<u8>,
    cache_control: Option<String>,
}

#[derive(Clone, Default)]
struct Recorder {
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl Recorder {
    fn last(&self) -> Captured {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("server saw a request")
    }
}

async fn redact_handler(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    mut multipart: Multipart,
) -> Response {
    let mut captured = Captured {
        query: query.clone(),
        cache_control: headers
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        ..Captured::default()
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("file") {
            captured.file_name = field.file_name().map(ToString::to_string);
            captured.file_bytes = field.bytes().await.unwrap().to_vec();
        }
    }
    recorder.requests.lock().unwrap().push(captured);

    if query.get("method").map(String::as_str) == Some("blur") {
        return (StatusCode::UNPROCESSABLE_ENTITY, "no face detected").into_response();
    }
    if query.get("method").map(String::as_str) == Some("box") {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    (
        [
            ("x-security-level", "high"),
            ("x-detection-method", "mediapipe"),
            ("content-type", "image/png"),
        ],
        PNG_BODY.to_vec(),
    )
        .into_response()
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

async fn redaction_server() -> (String, Recorder) {
    let recorder = Recorder::default();
    let router = Router::new()
        .route("/redact/face_image", post(redact_handler))
        .with_state(recorder.clone());
    (spawn_server(router).await, recorder)
}

/// Base URL on which nothing listens.
async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

fn request(method: RedactionMethod) -> RedactionRequest {
    RedactionRequest {
        file_name: "portrait.jpg".to_string(),
        bytes: Arc::from(&b"fake-jpeg-bytes"[..]),
        method,
        expand: 0.25,
        strength: 24,
        out_format: OutputFormat::Png,
        persona: Some("smiling man in his 20s".to_string()),
    }
}

#[tokio::test]
async fn test_redaction_success_wire_format() {
    let (base, recorder) = redaction_server().await;
    let api = HttpRedactionApi::with_base_url(base).expect("create client");

    let image = api
        .redact_face_image(request(RedactionMethod::Pixelate), CancellationToken::new())
        .await
        .expect("redaction succeeds");

    assert_eq!(image.bytes, PNG_BODY);
    assert_eq!(image.content_type.as_deref(), Some("image/png"));
    assert_eq!(image.metadata.security_level.as_deref(), Some("high"));
    assert_eq!(image.metadata.detector.as_deref(), Some("mediapipe"));

    let seen = recorder.last();
    assert_eq!(seen.query.get("method").map(String::as_str), Some("pixelate"));
    assert_eq!(seen.query.get("expand").map(String::as_str), Some("0.25"));
    assert_eq!(seen.query.get("strength").map(String::as_str), Some("24"));
    assert_eq!(seen.query.get("out_format").map(String::as_str), Some("PNG"));
    assert!(!seen.query.contains_key("persona"), "persona only for replace_face");
    assert_eq!(seen.file_name.as_deref(), Some("portrait.jpg"));
    assert_eq!(seen.file_bytes, b"fake-jpeg-bytes");
    assert_eq!(seen.cache_control.as_deref(), Some("no-store"));
}

#[tokio::test]
async fn test_replace_face_sends_persona() {
    let (base, recorder) = redaction_server().await;
    let api = HttpRedactionApi::with_base_url(base).expect("create client");

    api.redact_face_image(request(RedactionMethod::ReplaceFace), CancellationToken::new())
        .await
        .expect("redaction succeeds");

    let seen = recorder.last();
    assert_eq!(
        seen.query.get("persona").map(String::as_str),
        Some("smiling man in his 20s")
    );
}

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let (base, _recorder) = redaction_server().await;
    let api = HttpRedactionApi::with_base_url(base).expect("create client");

    let err = api
        .redact_face_image(request(RedactionMethod::Blur), CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Http { status: 422, .. }));
    assert_eq!(
        err.to_string(),
        "HTTP 422 Unprocessable Entity — no face detected"
    );
}

#[tokio::test]
async fn test_http_error_without_body() {
    let (base, _recorder) = redaction_server().await;
    let api = HttpRedactionApi::with_base_url(base).expect("create client");

    let err = api
        .redact_face_image(request(RedactionMethod::Box), CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");
}

#[tokio::test]
async fn test_cancellation_aborts_slow_request() {
    let router = Router::new().route(
        "/redact/face_image",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "late"
        }),
    );
    let base = spawn_server(router).await;
    let api = HttpRedactionApi::with_base_url(base).expect("create client");

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        api.redact_face_image(request(RedactionMethod::Pixelate), token),
    )
    .await
    .expect("cancellation returns promptly");

    assert!(result.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_probe_success_true() {
    let router = Router::new().route(
        "/security/status",
        get(|| async { Json(json!({ "current_level": "standard", "external_api_enabled": true })) }),
    );
    let api = HttpRedactionApi::with_base_url(spawn_server(router).await).expect("create client");

    let status = probe_capabilities(&api).await;
    assert!(status.external_api_enabled);
    assert_eq!(status.current_level.as_deref(), Some("standard"));
}

#[tokio::test]
async fn test_probe_success_false() {
    let router = Router::new().route(
        "/security/status",
        get(|| async { Json(json!({ "current_level": "offline", "external_api_enabled": false })) }),
    );
    let api = HttpRedactionApi::with_base_url(spawn_server(router).await).expect("create client");

    let status = probe_capabilities(&api).await;
    assert!(!status.external_api_enabled);
    assert_eq!(status.current_level.as_deref(), Some("offline"));
}

#[tokio::test]
async fn test_probe_malformed_json_fails_closed() {
    let router = Router::new().route("/security/status", get(|| async { "not json" }));
    let api = HttpRedactionApi::with_base_url(spawn_server(router).await).expect("create client");

    let status = probe_capabilities(&api).await;
    assert!(!status.external_api_enabled);
    assert_eq!(status.current_level.as_deref(), Some("unknown"));
}

#[tokio::test]
async fn test_probe_http_error_fails_closed() {
    let router = Router::new().route(
        "/security/status",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "external_api_enabled": true })),
            )
        }),
    );
    let api = HttpRedactionApi::with_base_url(spawn_server(router).await).expect("create client");

    let status = probe_capabilities(&api).await;
    assert!(!status.external_api_enabled, "error bodies never enable");
    assert_eq!(status.current_level.as_deref(), Some("unknown"));
}

#[tokio::test]
async fn test_probe_network_error_fails_closed() {
    let api = HttpRedactionApi::with_base_url(dead_base_url().await).expect("create client");

    let status = probe_capabilities(&api).await;
    assert!(!status.external_api_enabled);
    assert_eq!(status.current_level.as_deref(), Some("unknown"));
}
