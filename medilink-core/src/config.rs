//! Configuration management

use crate::error::{ErrorContext, MedilinkError, MedilinkResult};
use crate::logging::LoggingConfig;
use crate::validation_error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the Medilink client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedilinkConfig {
    pub api: ApiConfig,
    pub session: SessionSettings,
    pub logging: LoggingConfig,
}

/// Hospital API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the hospital API server
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string sent with every request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: 30,
            user_agent: "medilink/0.1".to_string(),
        }
    }
}

/// Session maintenance settings
///
/// The defaults match the observed contract: a 60 second maintenance tick with
/// a 60 second safety margin before token expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Interval between maintenance ticks, in seconds
    pub refresh_interval_secs: u64,
    /// Refresh when this close to token expiry, in seconds
    pub refresh_margin_secs: u64,
    /// Interval between token store checks for external invalidation, in seconds
    pub storage_poll_secs: u64,
    /// Path of the persisted token file; defaults to `<data dir>/token`
    pub token_path: Option<PathBuf>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60,
            refresh_margin_secs: 60,
            storage_poll_secs: 1,
            token_path: None,
        }
    }
}

impl SessionSettings {
    /// Resolve the token file path, falling back to the default data directory
    pub fn resolved_token_path(&self) -> PathBuf {
        self.token_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join("token"))
    }
}

/// Default data directory (`~/.medilink`)
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".medilink")
}

/// Default configuration file path (`~/.medilink/config.toml`)
pub fn default_config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

impl Default for MedilinkConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl MedilinkConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> MedilinkResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| MedilinkError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: MedilinkConfig =
            toml::from_str(&content).map_err(|e| MedilinkError::Config {
                message: format!("Failed to parse config: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config")
                    .with_operation("parse_toml")
                    .with_suggestion("Check TOML syntax in config file"),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the given path if present, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> MedilinkResult<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> MedilinkResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| MedilinkError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content).map_err(|e| MedilinkError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> MedilinkResult<()> {
        if self.api.base_url.is_empty() {
            return Err(validation_error!(
                "API base URL must not be empty",
                "api.base_url",
                "config"
            ));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(validation_error!(
                "API base URL must start with http:// or https://",
                "api.base_url",
                "config"
            ));
        }
        if self.api.timeout_seconds == 0 {
            return Err(validation_error!(
                "Request timeout must be at least 1 second",
                "api.timeout_seconds",
                "config"
            ));
        }
        if self.session.refresh_interval_secs == 0 {
            return Err(validation_error!(
                "Maintenance interval must be at least 1 second",
                "session.refresh_interval_secs",
                "config"
            ));
        }
        if self.session.storage_poll_secs == 0 {
            return Err(validation_error!(
                "Token store poll interval must be at least 1 second",
                "session.storage_poll_secs",
                "config"
            ));
        }
        Ok(())
    }
}
