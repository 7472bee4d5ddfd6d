//! Top-level application configuration.
//!
//! Configuration is stored in `<data-root>/config.yaml` and includes:
//! - The catalogue API base URL
//! - Default page size
//! - Retry policy for remote calls
//! - Whether to start in offline (local dataset) mode

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogueError, Result};
use crate::paths::config_path;
use crate::types::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL every API path is appended to
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Poses per page (default: 3)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Retry policy for remote calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Remote request timeout in seconds (default: 30)
    #[serde(default = "default_remote_timeout")]
    pub remote_timeout: u64,

    /// Start every session against the bundled local dataset
    #[serde(default)]
    pub offline: bool,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_remote_timeout() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1000
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, including the first (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Linear backoff step in milliseconds (default: 1000)
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            retry: RetryConfig::default(),
            remote_timeout: default_remote_timeout(),
            offline: false,
        }
    }
}

impl Config {
    /// Load configuration from the default location, then apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&config_path())?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from file, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CatalogueError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CatalogueError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            CatalogueError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, permissions)?;
        }

        Ok(())
    }

    /// Environment variables win over the config file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("YOGA_API_URL")
            && !url.is_empty()
        {
            self.api_base_url = url;
        }

        if let Ok(offline) = env::var("YOGA_OFFLINE") {
            self.offline = matches!(offline.to_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(CatalogueError::Config(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(CatalogueError::Config(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        url::Url::parse(&self.api_base_url)?;
        Ok(())
    }

    /// Set a value by its dotted key, as used by `yoga config set`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let parse_err = |what: &str| {
            CatalogueError::Config(format!("invalid value '{value}' for {key}: expected {what}"))
        };

        match key {
            "api_base_url" => {
                url::Url::parse(value)?;
                self.api_base_url = value.to_string();
            }
            "page_size" => {
                let size: u32 = value.parse().map_err(|_| parse_err("a number"))?;
                if size == 0 {
                    return Err(parse_err("a number of at least 1"));
                }
                self.page_size = size;
            }
            "retry.max_attempts" => {
                let attempts: u32 = value.parse().map_err(|_| parse_err("a number"))?;
                if attempts == 0 {
                    return Err(parse_err("a number of at least 1"));
                }
                self.retry.max_attempts = attempts;
            }
            "retry.backoff_ms" => {
                self.retry.backoff_ms = value.parse().map_err(|_| parse_err("milliseconds"))?;
            }
            "remote_timeout" => {
                self.remote_timeout = value.parse().map_err(|_| parse_err("seconds"))?;
            }
            "offline" => {
                self.offline = value.parse().map_err(|_| parse_err("true or false"))?;
            }
            _ => {
                return Err(CatalogueError::Config(format!(
                    "unknown config key '{key}'. Valid keys: {}",
                    Self::KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Keys accepted by [`Config::set_value`]
    pub const KEYS: &[&str] = &[
        "api_base_url",
        "page_size",
        "retry.max_attempts",
        "retry.backoff_ms",
        "remote_timeout",
        "offline",
    ];

    /// Get the remote operation timeout duration
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout)
    }
}
