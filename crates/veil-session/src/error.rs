//! Error types for the session layer.

use thiserror::Error;

const MIB: u64 = 1024 * 1024;

/// Reasons a form edit or submission is refused before any network call.
///
/// The `Display` text is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// No image has been selected
    #[error("no file selected")]
    NoFile,

    /// The selected image exceeds the upload limit
    #[error("file too large (max {}MB)", .limit.div_ceil(MIB))]
    FileTooLarge {
        /// Size of the selected file in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// `replace_face` needs a persona prompt
    #[error("enter a persona")]
    PersonaRequired,

    /// `replace_face` selected while the external API is disabled
    #[error("offline mode does not allow replace_face; choose another method")]
    ExternalApiUnavailable,

    /// `expand` outside [0.00, 0.50] or not a number
    #[error("expand must be between 0.00 and 0.50, got {0}")]
    ExpandOutOfRange(f64),

    /// `strength` outside [8, 80]
    #[error("strength must be between 8 and 80, got {0}")]
    StrengthOutOfRange(u32),
}

impl ValidationError {
    /// Message to surface in the result state, if any.
    ///
    /// A missing file only disables submission; it produces no message.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::NoFile => None,
            other => Some(other.to_string()),
        }
    }
}

/// Errors from session operations other than validation.
#[derive(Error, Debug)]
pub enum SessionError {
    /// There is no preview to save
    #[error("no preview available")]
    NoPreview,

    /// Writing the preview failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
