//! Preview commands.

use crate::error::CommandError;
use crate::state::AppState;
use serde::Serialize;
use std::path::PathBuf;
use veil_session::PreviewInfo;

/// Where a preview was written.
#[derive(Debug, Serialize)]
pub struct SavedPreview {
    /// Full path of the written file
    pub path: String,
    /// Bytes written
    pub size: usize,
}

/// Summary of the live preview, if any.
pub async fn get_preview(state: &AppState) -> Result<Option<PreviewInfo>, CommandError> {
    Ok(state.session.preview())
}

/// Save the live preview as `faceswap.<ext>` into `dir`, or into the
/// application download directory when no directory is given.
pub async fn save_preview(
    state: &AppState,
    dir: Option<String>,
) -> Result<SavedPreview, CommandError> {
    let dir = dir.map_or_else(|| state.default_download_dir(), PathBuf::from);
    let size = state
        .session
        .preview()
        .map(|p| p.size)
        .ok_or_else(|| CommandError::new("NO_PREVIEW", "No processed image to save"))?;
    let path = state.session.save_preview(&dir).await?;

    Ok(SavedPreview {
        path: path.display().to_string(),
        size,
    })
}
