//! Application state management.

use std::path::PathBuf;
use std::sync::Arc;
use veil_client::{HttpRedactionApi, RedactionApi};
use veil_core::AppConfig;
use veil_session::Session;

/// Global application state shared across all commands.
pub struct AppState {
    /// Configuration the session was built from
    pub config: AppConfig,

    /// The redaction client session. Wrapped in `Arc` so submissions can be
    /// spawned onto background tasks.
    pub session: Arc<Session>,
}

impl AppState {
    /// Build state talking to the configured service over HTTP.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: AppConfig) -> Result<Self, veil_client::ClientError> {
        let api = HttpRedactionApi::new(&config.api)?;
        Ok(Self::with_api(config, Arc::new(api)))
    }

    /// Build state around an existing backend.
    pub fn with_api(config: AppConfig, api: Arc<dyn RedactionApi>) -> Self {
        let session = Arc::new(Session::new(api, config.upload.max_file_bytes));
        Self { config, session }
    }

    /// Directory previews are saved to when the caller gives none.
    pub fn default_download_dir(&self) -> PathBuf {
        AppConfig::download_dir().unwrap_or_else(|e| {
            tracing::warn!("Falling back to temp dir for downloads: {}", e);
            std::env::temp_dir().join("veil")
        })
    }
}
