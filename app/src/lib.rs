//! Veil Application Shell
//!
//! This is the thin application shell a frontend drives through the
//! serialisable commands in [`commands`]. Core logic lives in the `crates/`
//! directory.

pub mod commands;
pub mod error;
pub mod state;

use state::AppState;
use tracing::info;
use veil_core::AppConfig;

/// Initialize tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,veil=debug"));

    // A host that already installed a subscriber keeps it.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();
}

/// Load configuration, build the session, and run the capability probe.
pub async fn start() -> anyhow::Result<AppState> {
    init_tracing();

    info!("Starting Veil v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_with_env()?;
    let state = AppState::new(config)?;
    let status = state.session.mount().await;
    info!(
        "Redaction service at {} (external API enabled: {})",
        state.session.api_base(),
        status.external_api_enabled
    );
    Ok(state)
}
