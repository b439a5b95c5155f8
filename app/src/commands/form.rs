//! Form editing commands.
//!
//! Every edit returns the refreshed snapshot so the frontend can re-render
//! from a single value.

use crate::error::CommandError;
use crate::state::AppState;
use std::path::PathBuf;
use tracing::info;
use veil_core::{OutputFormat, RedactionMethod};
use veil_session::{FormAction, SelectedFile, SessionSnapshot};

/// Read-only view of the whole session.
pub async fn get_form_state(state: &AppState) -> Result<SessionSnapshot, CommandError> {
    Ok(state.session.snapshot())
}

/// Read an image from disk and select it for upload.
///
/// Oversized files are still selected; the size check runs on submit so the
/// user sees the limit message there.
pub async fn select_file(state: &AppState, path: String) -> Result<SessionSnapshot, CommandError> {
    let path = PathBuf::from(path);
    let file = SelectedFile::from_path(&path).await.map_err(|e| {
        CommandError::with_details(
            "FILE_READ_FAILED",
            format!("Failed to read image: {e}"),
            serde_json::json!({ "path": path.display().to_string() }),
        )
    })?;
    info!("Selected {} ({} bytes)", file.file_name(), file.size());
    dispatch(state, FormAction::SelectFile(file))
}

/// Drop the selected image.
pub async fn clear_file(state: &AppState) -> Result<SessionSnapshot, CommandError> {
    dispatch(state, FormAction::ClearFile)
}

/// Choose a redaction method by its wire name.
///
/// `replace_face` is silently swapped for `pixelate` while the external API
/// is disabled; the snapshot's status message says so.
pub async fn set_method(state: &AppState, method: String) -> Result<SessionSnapshot, CommandError> {
    let method: RedactionMethod = method.parse()?;
    dispatch(state, FormAction::SetMethod(method))
}

/// Edit the persona prompt.
pub async fn set_persona(
    state: &AppState,
    persona: String,
) -> Result<SessionSnapshot, CommandError> {
    dispatch(state, FormAction::SetPersona(persona))
}

/// Move the expand slider.
pub async fn set_expand(state: &AppState, expand: f64) -> Result<SessionSnapshot, CommandError> {
    dispatch(state, FormAction::SetExpand(expand))
}

/// Move the strength slider.
pub async fn set_strength(state: &AppState, strength: u32) -> Result<SessionSnapshot, CommandError> {
    dispatch(state, FormAction::SetStrength(strength))
}

/// Choose the output format (`PNG`, `JPEG`, or `JPG`).
pub async fn set_output_format(
    state: &AppState,
    format: String,
) -> Result<SessionSnapshot, CommandError> {
    let format: OutputFormat = format.parse()?;
    dispatch(state, FormAction::SetOutputFormat(format))
}

fn dispatch(state: &AppState, action: FormAction) -> Result<SessionSnapshot, CommandError> {
    state.session.dispatch(action)?;
    Ok(state.session.snapshot())
}
