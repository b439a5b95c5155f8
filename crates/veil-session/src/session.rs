//! The redaction client session.

use crate::error::{SessionError, ValidationError};
use crate::form::{FormAction, FormState, OFFLINE_SWITCH_MESSAGE};
use crate::preview::{PreviewInfo, PreviewStore};
use crate::result::{ResultState, SUCCESS_MESSAGE};
use crate::submission::{SubmissionController, SubmissionOutcome};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use veil_client::{probe_capabilities, ClientError, RedactedImage, RedactionApi, ResponseMetadata};
use veil_core::{
    available_methods, CapabilityStatus, MethodOption, OutputFormat, RedactionMethod,
};

#[derive(Debug, Default)]
struct SessionState {
    capability: Option<CapabilityStatus>,
    form: FormState,
    result: ResultState,
    submissions: SubmissionController,
}

impl SessionState {
    /// Unknown capability counts as disabled.
    fn external_api_enabled(&self) -> bool {
        self.capability
            .as_ref()
            .is_some_and(|c| c.external_api_enabled)
    }

    fn enforce_offline_guard(&mut self) {
        if self.form.enforce_offline_guard(self.external_api_enabled()) {
            info!("External API unavailable, switched method to pixelate");
            self.result.status_message = Some(OFFLINE_SWITCH_MESSAGE.to_string());
        }
    }
}

/// One redaction client: capability, form, and results behind a single owner.
///
/// The internal lock is never held across an `.await`; network calls are the
/// only suspension points. Share it between tasks with `Arc<Session>`.
pub struct Session {
    api: Arc<dyn RedactionApi>,
    max_file_bytes: u64,
    previews: PreviewStore,
    probe: OnceCell<CapabilityStatus>,
    state: Mutex<SessionState>,
}

impl Session {
    /// Create a session talking to `api`, refusing uploads above `max_file_bytes`.
    #[must_use]
    pub fn new(api: Arc<dyn RedactionApi>, max_file_bytes: u64) -> Self {
        let mut state = SessionState::default();
        state.enforce_offline_guard();
        Self {
            api,
            max_file_bytes,
            previews: PreviewStore::new(),
            probe: OnceCell::new(),
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the capability probe. Only the first call reaches the network;
    /// later calls return the same status.
    pub async fn mount(&self) -> CapabilityStatus {
        self.probe
            .get_or_init(|| async {
                let status = probe_capabilities(self.api.as_ref()).await;
                self.replace_capability(status.clone());
                status
            })
            .await
            .clone()
    }

    /// Replace the capability status wholesale and re-run the offline guard.
    pub fn replace_capability(&self, status: CapabilityStatus) {
        let mut state = self.lock();
        debug!(
            "Capability replaced: external_api_enabled={}",
            status.external_api_enabled
        );
        state.capability = Some(status);
        state.enforce_offline_guard();
    }

    /// Apply a user edit, then re-run the offline guard.
    pub fn dispatch(&self, action: FormAction) -> Result<(), ValidationError> {
        let mut state = self.lock();
        state.form.apply(action)?;
        state.enforce_offline_guard();
        Ok(())
    }

    /// Methods currently offered.
    #[must_use]
    pub fn available_methods(&self) -> Vec<MethodOption> {
        available_methods(self.lock().external_api_enabled())
    }

    /// Copy of the current form.
    #[must_use]
    pub fn form(&self) -> FormState {
        self.lock().form.clone()
    }

    /// Current capability status, `None` before the probe settles.
    #[must_use]
    pub fn capability(&self) -> Option<CapabilityStatus> {
        self.lock().capability.clone()
    }

    /// Latest user-facing message.
    #[must_use]
    pub fn status_message(&self) -> Option<String> {
        self.lock().result.status_message.clone()
    }

    /// Metadata from the latest successful response.
    #[must_use]
    pub fn metadata(&self) -> ResponseMetadata {
        self.lock().result.metadata.clone()
    }

    /// Whether a submission is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.lock().submissions.is_busy()
    }

    /// The live preview, if any.
    #[must_use]
    pub fn preview(&self) -> Option<PreviewInfo> {
        self.lock().result.preview().map(|p| p.info())
    }

    /// Bytes of the live preview, if any.
    #[must_use]
    pub fn preview_bytes(&self) -> Option<Arc<[u8]>> {
        self.lock().result.preview().map(|p| p.bytes())
    }

    /// Counters for every preview this session created.
    #[must_use]
    pub fn previews(&self) -> &PreviewStore {
        &self.previews
    }

    /// Base URL of the redaction service.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api.base_url()
    }

    /// Everything a frontend needs to render.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        let enabled = state.external_api_enabled();
        let busy = state.submissions.is_busy();
        let form = &state.form;

        SessionSnapshot {
            capability: state.capability.clone(),
            offline_badge: state.capability.is_some() && !enabled,
            available_methods: available_methods(enabled),
            file: form.selected_file.as_ref().map(|f| FileInfo {
                name: f.file_name().to_string(),
                size: f.size(),
            }),
            method: form.method,
            persona: form.persona.clone(),
            persona_visible: form.persona_visible(enabled),
            expand: form.expand,
            strength: form.strength,
            strength_visible: form.strength_visible(),
            output_format: form.output_format,
            busy,
            can_submit: form.can_submit(busy),
            status_message: state.result.status_message.clone(),
            metadata: state.result.metadata.clone(),
            preview: state.result.preview().map(|p| p.info()),
        }
    }

    /// Validate, supersede any in-flight submission, send, and apply the result.
    ///
    /// A superseded submission settles as [`SubmissionOutcome::Cancelled`] and
    /// leaves the result state to the submission that replaced it.
    pub async fn submit(&self) -> SubmissionOutcome {
        let (ticket, request) = {
            let mut state = self.lock();
            let enabled = state.external_api_enabled();

            if let Err(err) = state.form.validate_for_submit(enabled, self.max_file_bytes) {
                debug!("Submission rejected: {}", err);
                if let Some(message) = err.user_message() {
                    state.result.status_message = Some(message);
                }
                return SubmissionOutcome::Rejected(err);
            }
            let Some(request) = state.form.to_request() else {
                return SubmissionOutcome::Rejected(ValidationError::NoFile);
            };

            let ticket = state.submissions.begin();
            state.result.clear_for_submission();
            (ticket, request)
        };

        let format = request.out_format;
        info!(
            "Submitting #{}: method={}, expand={}, strength={}, format={}",
            ticket.generation, request.method, request.expand, request.strength, format
        );

        let pending = PendingSubmission {
            session: self,
            generation: ticket.generation,
            armed: true,
        };
        let result = self
            .api
            .redact_face_image(request, ticket.token.clone())
            .await;
        pending.disarm();

        let mut state = self.lock();
        if !state.submissions.finish(ticket.generation) {
            debug!("Discarding superseded submission #{}", ticket.generation);
            return SubmissionOutcome::Cancelled;
        }

        match result {
            Ok(image) => {
                let RedactedImage {
                    bytes,
                    content_type,
                    metadata,
                } = image;
                let size = bytes.len();
                state.result.metadata = metadata;
                state
                    .result
                    .replace_preview(|| self.previews.create(bytes, content_type, format));
                state.result.status_message = Some(SUCCESS_MESSAGE.to_string());
                info!("Submission #{} done ({} bytes)", ticket.generation, size);
                SubmissionOutcome::Success { bytes: size }
            }
            Err(ClientError::Cancelled) => {
                debug!("Submission #{} cancelled", ticket.generation);
                SubmissionOutcome::Cancelled
            }
            Err(err @ ClientError::Http { status, .. }) => {
                let message = err.to_string();
                warn!("Submission #{} failed: {}", ticket.generation, message);
                state.result.status_message = Some(message.clone());
                SubmissionOutcome::HttpError { status, message }
            }
            Err(err) => {
                let message = err.to_string();
                warn!("Submission #{} failed: {}", ticket.generation, message);
                state.result.status_message = Some(message.clone());
                SubmissionOutcome::NetworkError { message }
            }
        }
    }

    /// Write the live preview to `dir` under its download name.
    ///
    /// # Errors
    /// Returns [`SessionError::NoPreview`] when there is nothing to save, or
    /// an I/O error if writing fails.
    pub async fn save_preview(&self, dir: &Path) -> Result<PathBuf, SessionError> {
        let (bytes, file_name) = {
            let state = self.lock();
            let preview = state.result.preview().ok_or(SessionError::NoPreview)?;
            (preview.bytes(), preview.download_file_name())
        };

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, &bytes[..]).await?;
        info!("Saved preview to {}", path.display());
        Ok(path)
    }
}

/// Settles a submission whose future is dropped while the request is out.
struct PendingSubmission<'a> {
    session: &'a Session,
    generation: u64,
    armed: bool,
}

impl PendingSubmission<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if self.armed && self.session.lock().submissions.abandon(self.generation) {
            debug!("Submission #{} dropped before settling", self.generation);
        }
    }
}

/// Name and size of the selected image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// File name
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

/// Read-only view of a session.
#[derive(Debug, Clone, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct SessionSnapshot {
    /// Probe result, `None` until it settles
    pub capability: Option<CapabilityStatus>,
    /// Whether to show the offline badge
    pub offline_badge: bool,
    /// Methods offered, in display order
    pub available_methods: Vec<MethodOption>,
    /// Selected image
    pub file: Option<FileInfo>,
    /// Selected method
    pub method: RedactionMethod,
    /// Persona prompt
    pub persona: String,
    /// Whether the persona input is shown
    pub persona_visible: bool,
    /// Expand ratio
    pub expand: f64,
    /// Strength
    pub strength: u32,
    /// Whether the strength slider is shown
    pub strength_visible: bool,
    /// Output format
    pub output_format: OutputFormat,
    /// Whether a submission is in flight
    pub busy: bool,
    /// Whether the submit control is enabled
    pub can_submit: bool,
    /// Latest message
    pub status_message: Option<String>,
    /// Latest response metadata
    pub metadata: ResponseMetadata,
    /// Live preview
    pub preview: Option<PreviewInfo>,
}
