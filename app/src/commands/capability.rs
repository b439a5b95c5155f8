//! Capability probe commands.

use crate::error::CommandError;
use crate::state::AppState;
use veil_core::{CapabilityStatus, MethodOption};

/// Current capability status, running the probe if it has not run yet.
///
/// The probe never fails from the caller's point of view: an unreachable
/// service reports level `unknown` with the external API disabled.
pub async fn get_security_status(state: &AppState) -> Result<CapabilityStatus, CommandError> {
    Ok(state.session.mount().await)
}

/// Methods the user may pick under the current capability.
pub async fn get_available_methods(state: &AppState) -> Result<Vec<MethodOption>, CommandError> {
    Ok(state.session.available_methods())
}
