//! Configuration management for Veil.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use crate::types::MAX_UPLOAD_BYTES;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// API base used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Environment variable overriding [`ApiConfig::base_url`].
pub const ENV_API_BASE: &str = "VEIL_API_BASE";

/// Environment variable overriding [`ApiConfig::request_timeout_secs`].
pub const ENV_REQUEST_TIMEOUT: &str = "VEIL_REQUEST_TIMEOUT_SECS";

/// Main application configuration.
///
/// This is loaded from `~/.config/veil/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote redaction service settings
    pub api: ApiConfig,
    /// Client-side upload limits
    pub upload: UploadConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let config = if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            tracing::debug!("Config file not found, using defaults");
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `VEIL_API_BASE`: Override the remote service base URL
    /// - `VEIL_REQUEST_TIMEOUT_SECS`: Override the request timeout (0 disables it)
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Override api.base_url from env: {}", base);
            self.api.base_url = base.trim().to_string();
        }

        if let Some(val) = lookup(ENV_REQUEST_TIMEOUT) {
            if let Ok(secs) = val.trim().parse::<u64>() {
                self.api.request_timeout_secs = (secs > 0).then_some(secs);
                tracing::debug!("Override api.request_timeout_secs from env: {}", secs);
            }
        }
    }

    /// Check values that serde alone cannot constrain.
    pub fn validate(&self) -> ConfigResult<()> {
        let base = self.api.base_url.trim();
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }

        if self.upload.max_file_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "upload.max_file_bytes".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/veil/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "veil", "veil").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the download directory used when saving previews.
    ///
    /// Uses XDG base directories: `~/.local/share/veil/downloads`
    pub fn download_dir() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "veil", "veil").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().join("downloads"))
    }
}

/// Remote redaction service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the redaction service
    pub base_url: String,
    /// Optional per-request timeout in seconds (none by default)
    pub request_timeout_secs: Option<u64>,
}

impl ApiConfig {
    /// Base URL without a trailing slash, ready for path joining.
    #[must_use]
    pub fn normalized_base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Client-side upload limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest file accepted before any network call, in bytes
    pub max_file_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_UPLOAD_BYTES,
        }
    }
}
