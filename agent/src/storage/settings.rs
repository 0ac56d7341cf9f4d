//! Settings file management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ToggleError;
use crate::filesys::file::File;
use crate::http::fleet::Region;
use crate::logs::LogLevel;

/// Agent settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Also write logs to files in this directory
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Fleet API configuration
    #[serde(default)]
    pub fleet: FleetSettings,

    /// Secrets file; defaults to `secrets.json` in the config directory
    #[serde(default)]
    pub secrets_file: Option<PathBuf>,

    /// Where the signing key is staged; chosen from the host when unset
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    /// Wake-up protocol configuration
    #[serde(default)]
    pub wake: WakeSettings,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetrySettings,
}

impl Settings {
    /// Read settings, falling back to defaults when the file does not exist
    pub async fn load_or_default(file: &File) -> Result<Self, ToggleError> {
        if !file.exists().await {
            debug!("No settings at {}, using defaults", file.path().display());
            return Ok(Self::default());
        }
        file.read_json().await.map_err(|e| {
            ToggleError::ConfigError(format!(
                "Unable to read settings file {}: {}",
                file.path().display(),
                e
            ))
        })
    }
}

/// Fleet API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetSettings {
    /// Region selecting the default base URL
    #[serde(default)]
    pub region: Region,

    /// Explicit base URL, overrides the region
    #[serde(default)]
    pub base_url: Option<String>,

    /// OAuth token endpoint
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Vehicle command signing proxy
    #[serde(default)]
    pub command_proxy_url: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_auth_url() -> String {
    "https://auth.tesla.com/oauth2/v3/token".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl FleetSettings {
    /// Base URL in effect
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.region.base_url().to_string())
    }
}

impl Default for FleetSettings {
    fn default() -> Self {
        Self {
            region: Region::default(),
            base_url: None,
            auth_url: default_auth_url(),
            command_proxy_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Wake-up protocol settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WakeSettings {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_round_timeout")]
    pub round_timeout_secs: u64,

    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_poll_interval() -> u64 {
    5
}

fn default_round_timeout() -> u64 {
    65
}

fn default_max_rounds() -> u32 {
    5
}

impl Default for WakeSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            round_timeout_secs: default_round_timeout(),
            max_rounds: default_max_rounds(),
        }
    }
}

/// Retry envelope settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay")]
    pub base_delay_secs: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay() -> u64 {
    1
}

fn default_multiplier() -> f64 {
    2.0
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_secs: default_base_delay(),
            multiplier: default_multiplier(),
        }
    }
}
