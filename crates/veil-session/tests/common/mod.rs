//! Scripted in-memory redaction backend shared by the session tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use veil_client::{
    ClientError, RedactedImage, RedactionApi, RedactionRequest, ResponseMetadata, Result,
};
use veil_core::{CapabilityStatus, MAX_UPLOAD_BYTES};
use veil_session::Session;

/// What the fake answers to one redaction call.
#[derive(Debug, Clone)]
pub enum Reply {
    Image {
        bytes: Vec<u8>,
        level: Option<&'static str>,
        detector: Option<&'static str>,
    },
    Http {
        status: u16,
        reason: &'static str,
        body: &'static str,
    },
    Network(&'static str),
}

impl Reply {
    pub fn png(bytes: &[u8]) -> Self {
        Self::Image {
            bytes: bytes.to_vec(),
            level: Some("high"),
            detector: Some("mediapipe"),
        }
    }
}

struct Scripted {
    reply: Reply,
    gate: Option<oneshot::Receiver<()>>,
    honor_cancel: bool,
}

pub struct FakeApi {
    status: Option<CapabilityStatus>,
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RedactionRequest>>,
    status_calls: AtomicUsize,
}

impl FakeApi {
    fn with_status(status: Option<CapabilityStatus>) -> Arc<Self> {
        Arc::new(Self {
            status,
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
        })
    }

    /// Status endpoint reports the external API as enabled.
    pub fn online() -> Arc<Self> {
        Self::with_status(Some(CapabilityStatus {
            current_level: Some("standard".to_string()),
            external_api_enabled: true,
        }))
    }

    /// Status endpoint reports the external API as disabled.
    pub fn offline() -> Arc<Self> {
        Self::with_status(Some(CapabilityStatus {
            current_level: Some("offline".to_string()),
            external_api_enabled: false,
        }))
    }

    /// Status endpoint is unreachable.
    pub fn unreachable() -> Arc<Self> {
        Self::with_status(None)
    }

    /// Queue an immediate reply.
    pub fn push(&self, reply: Reply) {
        self.enqueue(reply, None, false);
    }

    /// Queue a reply held until the returned sender fires. The fake ignores
    /// cancellation, so the session alone must discard the stale result.
    pub fn push_gated(&self, reply: Reply) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.enqueue(reply, Some(rx), false);
        tx
    }

    /// Queue a held reply that gives up as soon as its token is cancelled.
    pub fn push_cancellable(&self, reply: Reply) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.enqueue(reply, Some(rx), true);
        tx
    }

    fn enqueue(&self, reply: Reply, gate: Option<oneshot::Receiver<()>>, honor_cancel: bool) {
        self.script.lock().unwrap().push_back(Scripted {
            reply,
            gate,
            honor_cancel,
        });
    }

    pub fn redaction_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> RedactionRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("at least one redaction call")
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RedactionApi for FakeApi {
    async fn security_status(&self) -> Result<CapabilityStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status
            .clone()
            .ok_or_else(|| ClientError::Client("status endpoint unreachable".to_string()))
    }

    async fn redact_face_image(
        &self,
        request: RedactionRequest,
        cancel: CancellationToken,
    ) -> Result<RedactedImage> {
        self.requests.lock().unwrap().push(request);
        let scripted = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("a scripted reply for every call");

        if let Some(gate) = scripted.gate {
            if scripted.honor_cancel {
                tokio::select! {
                    () = cancel.cancelled() => return Err(ClientError::Cancelled),
                    _ = gate => {}
                }
            } else {
                let _ = gate.await;
            }
        }

        match scripted.reply {
            Reply::Image {
                bytes,
                level,
                detector,
            } => Ok(RedactedImage {
                bytes,
                content_type: Some("image/png".to_string()),
                metadata: ResponseMetadata {
                    security_level: level.map(ToString::to_string),
                    detector: detector.map(ToString::to_string),
                },
            }),
            Reply::Http {
                status,
                reason,
                body,
            } => Err(ClientError::Http {
                status,
                reason: reason.to_string(),
                body: body.to_string(),
            }),
            Reply::Network(message) => Err(ClientError::Client(message.to_string())),
        }
    }

    fn base_url(&self) -> &str {
        "http://fake.invalid"
    }
}

/// Session over `api` with the default 50 MiB limit.
pub fn session_with(api: &Arc<FakeApi>) -> Arc<Session> {
    let dyn_api: Arc<dyn RedactionApi> = api.clone();
    Arc::new(Session::new(dyn_api, MAX_UPLOAD_BYTES))
}
