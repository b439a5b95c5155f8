//! Form state manager.
//!
//! Holds the user's selections and applies [`FormAction`] transitions. The
//! offline guard keeps `replace_face` unreachable while the external API is
//! disabled; callers re-run it after every transition and capability change.

use crate::error::ValidationError;
use std::path::Path;
use std::sync::Arc;
use veil_client::RedactionRequest;
use veil_core::{
    OutputFormat, RedactionMethod, EXPAND_MAX, EXPAND_MIN, STRENGTH_MAX, STRENGTH_MIN,
};

/// Message shown when the offline guard switches the method.
pub const OFFLINE_SWITCH_MESSAGE: &str = "external API unavailable; switched to pixelate";

/// Persona prompt pre-filled for `replace_face`.
pub const DEFAULT_PERSONA: &str = "smiling man in his 20s";

/// An image chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    file_name: String,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    /// Wrap bytes already in memory.
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an image from disk.
    ///
    /// # Errors
    /// Returns error if the file cannot be read.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::from_bytes(file_name, bytes))
    }

    /// Name sent with the multipart part.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Shared handle to the raw bytes.
    #[must_use]
    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }
}

/// A single user edit.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    /// Choose an image
    SelectFile(SelectedFile),
    /// Drop the chosen image
    ClearFile,
    /// Choose a redaction method
    SetMethod(RedactionMethod),
    /// Edit the persona prompt
    SetPersona(String),
    /// Move the expand slider
    SetExpand(f64),
    /// Move the strength slider
    SetStrength(u32),
    /// Choose the output format
    SetOutputFormat(OutputFormat),
}

/// The user's current selections.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// Image to upload
    pub selected_file: Option<SelectedFile>,
    /// Redaction method
    pub method: RedactionMethod,
    /// Persona prompt for `replace_face`
    pub persona: String,
    /// Face box expansion ratio, in [0, 0.5] on a 0.01 grid
    pub expand: f64,
    /// Effect strength, in [8, 80]
    pub strength: u32,
    /// Requested output format
    pub output_format: OutputFormat,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            selected_file: None,
            method: RedactionMethod::Pixelate,
            persona: DEFAULT_PERSONA.to_string(),
            expand: 0.25,
            strength: 24,
            output_format: OutputFormat::Png,
        }
    }
}

impl FormState {
    /// Apply one edit. Out-of-range slider values are refused and leave the
    /// state unchanged.
    pub fn apply(&mut self, action: FormAction) -> Result<(), ValidationError> {
        match action {
            FormAction::SelectFile(file) => self.selected_file = Some(file),
            FormAction::ClearFile => self.selected_file = None,
            FormAction::SetMethod(method) => self.method = method,
            FormAction::SetPersona(persona) => self.persona = persona,
            FormAction::SetExpand(expand) => self.expand = snap_expand(expand)?,
            FormAction::SetStrength(strength) => {
                if !(STRENGTH_MIN..=STRENGTH_MAX).contains(&strength) {
                    return Err(ValidationError::StrengthOutOfRange(strength));
                }
                self.strength = strength;
            }
            FormAction::SetOutputFormat(format) => self.output_format = format,
        }
        Ok(())
    }

    /// Reset `replace_face` to pixelate when the external API is disabled.
    ///
    /// Returns whether the method changed. Idempotent.
    pub fn enforce_offline_guard(&mut self, external_api_enabled: bool) -> bool {
        if !external_api_enabled && self.method == RedactionMethod::ReplaceFace {
            self.method = RedactionMethod::Pixelate;
            return true;
        }
        false
    }

    fn persona_missing(&self) -> bool {
        self.method == RedactionMethod::ReplaceFace && self.persona.trim().is_empty()
    }

    /// Check everything a submission needs, in the order the user sees it.
    pub fn validate_for_submit(
        &self,
        external_api_enabled: bool,
        max_file_bytes: u64,
    ) -> Result<(), ValidationError> {
        let file = self.selected_file.as_ref().ok_or(ValidationError::NoFile)?;

        if file.size() > max_file_bytes {
            return Err(ValidationError::FileTooLarge {
                size: file.size(),
                limit: max_file_bytes,
            });
        }

        if self.persona_missing() {
            return Err(ValidationError::PersonaRequired);
        }

        // The guard should already have made this unreachable.
        if !external_api_enabled && self.method.requires_external_api() {
            return Err(ValidationError::ExternalApiUnavailable);
        }

        Ok(())
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self, busy: bool) -> bool {
        self.selected_file.is_some() && !busy && !self.persona_missing()
    }

    /// Whether the persona input is shown.
    #[must_use]
    pub fn persona_visible(&self, external_api_enabled: bool) -> bool {
        external_api_enabled && self.method == RedactionMethod::ReplaceFace
    }

    /// Whether the strength slider is shown.
    #[must_use]
    pub fn strength_visible(&self) -> bool {
        self.method.uses_strength()
    }

    /// Build the request for the current selections, if a file is chosen.
    #[must_use]
    pub fn to_request(&self) -> Option<RedactionRequest> {
        let file = self.selected_file.as_ref()?;
        Some(RedactionRequest {
            file_name: file.file_name().to_string(),
            bytes: Arc::clone(file.bytes()),
            method: self.method,
            expand: self.expand,
            strength: self.strength,
            out_format: self.output_format,
            persona: (self.method == RedactionMethod::ReplaceFace).then(|| self.persona.clone()),
        })
    }
}

fn snap_expand(expand: f64) -> Result<f64, ValidationError> {
    if !expand.is_finite() || !(EXPAND_MIN..=EXPAND_MAX).contains(&expand) {
        return Err(ValidationError::ExpandOutOfRange(expand));
    }
    Ok((expand * 100.0).round() / 100.0)
}
