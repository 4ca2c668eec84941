//! Configuration management for cashdesk
//!
//! This module handles loading, validation, and management of
//! cashdesk configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Remote record store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the record store API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds, applied by the HTTP transport
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token sent with every request (optional)
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

impl RemoteConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Active account context
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Id of the account that owns new and edited transactions
    #[serde(default)]
    pub account_id: String,
}

/// Accept rules of the file drop area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentsConfig {
    /// MIME type prefixes that are accepted (e.g. "image/")
    #[serde(default = "default_mime_prefixes")]
    pub accepted_mime_prefixes: Vec<String>,
    /// File extensions that are accepted, with leading dot
    #[serde(default = "default_extensions")]
    pub accepted_extensions: Vec<String>,
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            accepted_mime_prefixes: default_mime_prefixes(),
            accepted_extensions: default_extensions(),
        }
    }
}

fn default_mime_prefixes() -> Vec<String> {
    vec!["image/".to_string()]
}

fn default_extensions() -> Vec<String> {
    vec![
        ".png".to_string(),
        ".jpeg".to_string(),
        ".jpg".to_string(),
        ".pdf".to_string(),
    ]
}

/// Transaction list behaviour
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListConfig {
    /// Re-fetch the list when an optimistic delete is rejected by the store
    #[serde(default = "default_false")]
    pub reload_on_delete_failure: bool,
}

fn default_false() -> bool {
    false
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote store settings
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Active account
    #[serde(default)]
    pub session: SessionConfig,
    /// Attachment accept rules
    #[serde(default)]
    pub attachments: AttachmentsConfig,
    /// List settings
    #[serde(default)]
    pub list: ListConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().into_owned(),
            });
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::IoError)?;

        let config = Self::from_yaml(&content)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from YAML text without validating it
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        serde_yaml::from_str(content).map_err(|_| ConfigError::InvalidYaml)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        let base_url = self.remote.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "remote.base_url".to_string(),
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "remote.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        if self.remote.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "remote.timeout_secs".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if let Some(ext) = self
            .attachments
            .accepted_extensions
            .iter()
            .find(|ext| !ext.starts_with('.'))
        {
            return Err(ConfigError::InvalidValue {
                field: "attachments.accepted_extensions".to_string(),
                reason: format!("Extension '{}' must start with a dot", ext),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        self.remote.timeout()
    }

    /// Active account id, if one is configured
    pub fn account_id(&self) -> Option<&str> {
        let id = self.session.account_id.trim();
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }
}

// ==================== Tests ====================
