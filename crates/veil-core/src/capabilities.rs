//! Remote capability status and the method options it gates.
//!
//! The remote service reports whether external (cloud) processing is allowed.
//! When it is not, or when the status cannot be determined, the client hides
//! every method that needs the external API.

use crate::types::RedactionMethod;
use serde::{Deserialize, Serialize};

/// Security level reported when the status endpoint cannot be reached.
pub const UNKNOWN_LEVEL: &str = "unknown";

/// Capability status reported by `/security/status`.
///
/// Replaced wholesale when a new status arrives, never edited field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityStatus {
    /// Security level label reported by the service, if any
    pub current_level: Option<String>,
    /// Whether methods backed by the external API may be offered
    pub external_api_enabled: bool,
}

impl CapabilityStatus {
    /// Status used whenever the probe fails: the most restrictive configuration.
    #[must_use]
    pub fn fail_closed() -> Self {
        Self {
            current_level: Some(UNKNOWN_LEVEL.to_string()),
            external_api_enabled: false,
        }
    }

    /// Whether the given method is permitted under this status.
    #[must_use]
    pub fn allows(&self, method: RedactionMethod) -> bool {
        self.external_api_enabled || !method.requires_external_api()
    }
}

/// A selectable method with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodOption {
    /// The method sent to the service
    pub method: RedactionMethod,
    /// Label shown to the user
    pub label: &'static str,
}

impl MethodOption {
    const fn new(method: RedactionMethod, label: &'static str) -> Self {
        Self { method, label }
    }
}

const ONLINE_METHODS: [MethodOption; 6] = [
    MethodOption::new(RedactionMethod::ReplaceFace, "replace_face (external API)"),
    MethodOption::new(RedactionMethod::Pixelate, "pixelate"),
    MethodOption::new(RedactionMethod::PixelateStrict, "pixelate_strict"),
    MethodOption::new(RedactionMethod::Blur, "blur"),
    MethodOption::new(RedactionMethod::SmartBlur, "smart_blur"),
    MethodOption::new(RedactionMethod::Box, "box"),
];

// pixelate_strict is the closest offline substitute for replace_face.
const OFFLINE_METHODS: [MethodOption; 5] = [
    MethodOption::new(RedactionMethod::Pixelate, "pixelate"),
    MethodOption::new(RedactionMethod::PixelateStrict, "smart pixelate (no outline)"),
    MethodOption::new(RedactionMethod::Blur, "blur"),
    MethodOption::new(RedactionMethod::SmartBlur, "smart_blur"),
    MethodOption::new(RedactionMethod::Box, "box"),
];

/// Methods offered for the given external API flag, in display order.
#[must_use]
pub fn available_methods(external_api_enabled: bool) -> Vec<MethodOption> {
    if external_api_enabled {
        ONLINE_METHODS.to_vec()
    } else {
        OFFLINE_METHODS.to_vec()
    }
}
