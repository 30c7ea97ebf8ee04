//! Configuration for the rostrum client layer.
//!
//! Supports YAML file and environment variable overrides.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::utils::retry::RetryConfig;

/// Errors that can occur loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    FileRead(String, String),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content service connection.
    pub service: ServiceConfig,
    /// Retry budget for transient failures.
    pub retry: RetrySettings,
    /// Edition resolution behavior.
    pub resolution: ResolutionConfig,
}

/// Content service connection configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the content service API.
    pub base_url: String,
    /// Bearer token for editor operations. None = anonymous reads.
    pub api_token: Option<String>,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            api_token: None,
            timeout_secs: 30,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry budget configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds; attempt N waits base * N.
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetrySettings {
    /// Materialize the settings as a retry policy.
    pub fn policy(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.base_delay_ms),
        }
    }
}

/// Edition resolution configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Year to fall back to when no edition holds the active flag.
    pub default_year: i32,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self { default_year: 2026 }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (ROSTRUM_CONFIG, default `config.yaml`)
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("ROSTRUM_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CONTENT_SERVICE_URL") {
            self.service.base_url = url;
        }

        if let Ok(token) = std::env::var("CONTENT_API_TOKEN") {
            self.service.api_token = Some(token);
        }

        if let Ok(year) = std::env::var("DEFAULT_EDITION_YEAR") {
            if let Ok(y) = year.parse() {
                self.resolution.default_year = y;
            }
        }

        if let Ok(attempts) = std::env::var("CONTENT_RETRY_MAX_ATTEMPTS") {
            if let Ok(a) = attempts.parse() {
                self.retry.max_attempts = a;
            }
        }
    }
}
