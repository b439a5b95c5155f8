//! Shared types used across the Veil client.
//!
//! Redaction methods, output formats, and the numeric parameter domains the
//! remote service accepts.

use crate::error::VeilError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest image accepted for upload (50 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Lower bound of the `expand` parameter.
pub const EXPAND_MIN: f64 = 0.0;
/// Upper bound of the `expand` parameter.
pub const EXPAND_MAX: f64 = 0.5;

/// Lower bound of the `strength` parameter.
pub const STRENGTH_MIN: u32 = 8;
/// Upper bound of the `strength` parameter.
pub const STRENGTH_MAX: u32 = 80;

/// Redaction algorithm offered by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionMethod {
    /// Replace detected faces with a generated persona (external API)
    ReplaceFace,
    /// Pixelate face regions
    Pixelate,
    /// Pixelate following the face contour
    PixelateStrict,
    /// Gaussian blur over face regions
    Blur,
    /// Solid box over face regions
    Box,
    /// Contour-aware blur
    SmartBlur,
}

impl RedactionMethod {
    /// All methods, in the order the remote service documents them.
    pub const ALL: [RedactionMethod; 6] = [
        Self::ReplaceFace,
        Self::Pixelate,
        Self::PixelateStrict,
        Self::Blur,
        Self::Box,
        Self::SmartBlur,
    ];

    /// Wire name used in the `method` query parameter.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReplaceFace => "replace_face",
            Self::Pixelate => "pixelate",
            Self::PixelateStrict => "pixelate_strict",
            Self::Blur => "blur",
            Self::Box => "box",
            Self::SmartBlur => "smart_blur",
        }
    }

    /// Whether this method calls out to the external (cloud) API.
    #[must_use]
    pub fn requires_external_api(&self) -> bool {
        matches!(self, Self::ReplaceFace)
    }

    /// Whether the `strength` parameter has any effect.
    ///
    /// The value is still sent for `box`; only the control is hidden.
    #[must_use]
    pub fn uses_strength(&self) -> bool {
        !matches!(self, Self::Box)
    }
}

impl fmt::Display for RedactionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedactionMethod {
    type Err = VeilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| VeilError::UnknownVariant {
                kind: "method",
                value: s.to_string(),
            })
    }
}

/// Image format requested from the remote service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    /// Lossless PNG
    #[default]
    Png,
    /// JPEG
    Jpeg,
}

impl OutputFormat {
    /// Wire name used in the `out_format` query parameter.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
        }
    }

    /// File extension for downloads.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    /// MIME type assumed when the response does not declare one.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = VeilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PNG" => Ok(Self::Png),
            "JPEG" | "JPG" => Ok(Self::Jpeg),
            _ => Err(VeilError::UnknownVariant {
                kind: "output format",
                value: s.to_string(),
            }),
        }
    }
}
