//! Configuration loading for the Ads API client.
//!
//! Credentials are required. `api_root`, `request_timeout_ms` and
//! `attach_appsecret_proof` fall back to the Graph API root, 30s and `false`.

use fbads_core::{Credentials, FACEBOOK_API};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "FBADS_CONFIG";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_api_root")]
    pub api_root: String,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Attach `appsecret_proof` to every call. Only needed when the app
    /// enforces "Require App Secret" in its settings.
    #[serde(default)]
    pub attach_appsecret_proof: bool,
    pub credentials: CredentialsConfig,
}

#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    pub access_token: String,
    pub app_id: String,
    pub app_secret: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("app_id", &self.app_id)
            .field("access_token", &"[REDACTED]")
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}

fn default_api_root() -> String {
    FACEBOOK_API.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (set FBADS_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ClientConfig {
    pub fn new(credentials: CredentialsConfig) -> Self {
        Self {
            api_root: default_api_root(),
            request_timeout_ms: default_timeout_ms(),
            attach_appsecret_proof: false,
            credentials,
        }
    }

    /// Load from the file named by `FBADS_CONFIG`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_env().ok_or(ConfigError::MissingConfigPath)?;
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let root = self.api_root.trim();
        if root.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_root",
                reason: "must not be empty".to_string(),
            });
        }
        if !root.starts_with("http://") && !root.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "api_root",
                reason: "must be an http(s) URL".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.credentials.access_token.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "credentials.access_token",
                reason: "must not be empty".to_string(),
            });
        }
        if self.credentials.app_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "credentials.app_id",
                reason: "must not be empty".to_string(),
            });
        }
        if self.credentials.app_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "credentials.app_secret",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.credentials.access_token.clone(),
            self.credentials.app_id.clone(),
            self.credentials.app_secret.clone(),
        )
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV).ok().map(PathBuf::from)
}
