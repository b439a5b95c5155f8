//! Capability probe.
//!
//! Asks the service once whether external-API processing is permitted. Any
//! failure yields [`CapabilityStatus::fail_closed`]; the probe never fails open.

use crate::api::RedactionApi;
use serde_json::Value;
use tracing::{info, warn};
use veil_core::CapabilityStatus;

/// Query `/security/status` and map every failure to the restrictive default.
pub async fn probe_capabilities(api: &dyn RedactionApi) -> CapabilityStatus {
    match api.security_status().await {
        Ok(status) => {
            info!(
                "Capability probe: level={:?}, external_api_enabled={}",
                status.current_level, status.external_api_enabled
            );
            status
        }
        Err(e) => {
            warn!("Capability probe failed against {}: {}", api.base_url(), e);
            CapabilityStatus::fail_closed()
        }
    }
}

/// Interpret a `/security/status` body.
///
/// `external_api_enabled` counts only when it is the JSON literal `true`;
/// `current_level` is kept only when it is a string.
#[must_use]
pub fn status_from_json(value: &Value) -> CapabilityStatus {
    CapabilityStatus {
        current_level: value
            .get("current_level")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        external_api_enabled: matches!(value.get("external_api_enabled"), Some(Value::Bool(true))),
    }
}
