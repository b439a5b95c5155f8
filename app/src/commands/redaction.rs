//! Redaction submission command.

use crate::error::CommandError;
use crate::state::AppState;
use serde::Serialize;
use tracing::info;
use veil_client::ResponseMetadata;
use veil_session::{PreviewInfo, SubmissionOutcome};

/// Result of a submit call as seen by the frontend.
#[derive(Debug, Serialize)]
pub struct SubmissionReport {
    /// One of `rejected`, `cancelled`, `http_error`, `success`, `network_error`
    pub outcome: &'static str,
    /// HTTP status when the service rejected the request
    pub http_status: Option<u16>,
    /// Message now shown in the result area
    pub status_message: Option<String>,
    /// Headers reported by the latest successful response
    pub metadata: ResponseMetadata,
    /// Live preview after the call settled
    pub preview: Option<PreviewInfo>,
}

/// Validate the form and send it to the redaction service.
///
/// Validation failures and service errors are reported in the returned
/// report rather than as a `CommandError`, so a newer call superseding this
/// one shows up as `cancelled`.
pub async fn submit_redaction(state: &AppState) -> Result<SubmissionReport, CommandError> {
    let outcome = state.session.submit().await;
    info!("Submission settled: {}", outcome.label());

    let http_status = match &outcome {
        SubmissionOutcome::HttpError { status, .. } => Some(*status),
        _ => None,
    };

    Ok(SubmissionReport {
        outcome: outcome.label(),
        http_status,
        status_message: state.session.status_message(),
        metadata: state.session.metadata(),
        preview: state.session.preview(),
    })
}
