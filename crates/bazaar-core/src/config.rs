//! Configuration management for bazaar.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// Loaded from `~/.config/bazaar/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Page rendering settings
    pub renderer: RendererConfig,
    /// Downstream sink settings
    pub sink: SinkConfig,
    /// Chat-webhook reporting settings
    pub reporting: ReportingConfig,
}

/// Which rendering transport an invocation should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererMode {
    /// Drive a locally installed headless Chromium
    Local,
    /// POST urls to a remote rendering service
    #[default]
    Remote,
}

/// Page rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Rendering transport to use
    pub mode: RendererMode,
    /// Base URL of the remote rendering service
    pub remote_endpoint: String,
    /// API token for the remote rendering service
    pub remote_token: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            mode: RendererMode::Remote,
            remote_endpoint: "https://chrome.browserless.io".to_string(),
            remote_token: String::new(),
        }
    }
}

/// Downstream sink settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// URL accepting flushed item batches; unset disables delivery
    pub endpoint: Option<String>,
}

/// Chat-webhook reporting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Webhook URL; unset falls back to log-only reporting
    pub webhook_url: Option<String>,
    /// Channel for informational messages (flush summaries)
    pub info_channel: String,
    /// Channel for error reports (parser faults, failed invocations)
    pub errors_channel: String,
    /// Username the reports are posted under
    pub username: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            info_channel: "harvest".to_string(),
            errors_channel: "harvest-errors".to_string(),
            username: "bazaar".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if the config directory cannot be determined, or the
    /// file exists but cannot be read or parsed.
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `BAZAAR_RENDERER_MODE`: `local` or `remote`
    /// - `BAZAAR_REMOTE_TOKEN`: token for the remote rendering service
    /// - `BAZAAR_SINK_ENDPOINT`: downstream batch endpoint
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        if let Ok(val) = std::env::var("BAZAAR_RENDERER_MODE") {
            match val.to_lowercase().as_str() {
                "local" => config.renderer.mode = RendererMode::Local,
                "remote" => config.renderer.mode = RendererMode::Remote,
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: "renderer.mode".to_string(),
                        reason: format!("unknown mode '{other}'"),
                    })
                }
            }
            tracing::debug!("Override renderer.mode from env: {:?}", config.renderer.mode);
        }

        if let Ok(val) = std::env::var("BAZAAR_REMOTE_TOKEN") {
            config.renderer.remote_token = val;
        }

        if let Ok(val) = std::env::var("BAZAAR_SINK_ENDPOINT") {
            config.sink.endpoint = Some(val);
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/bazaar/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "bazarhub", "bazaar").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}
