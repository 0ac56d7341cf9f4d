//! Application configuration options

use std::path::PathBuf;
use std::time::Duration;

use crate::control::{retry, wake};
use crate::filesys::dir::Dir;
use crate::http::fleet::FleetOptions;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;
use crate::utils::CooldownOptions;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Secrets file backing the secret store
    pub secrets_file: PathBuf,

    /// Scratch directory for the staged signing key
    pub scratch_dir: PathBuf,

    /// OAuth token endpoint
    pub token_url: String,

    /// Timeout of token endpoint requests
    pub token_timeout: Duration,

    /// Fleet API options
    pub fleet: FleetOptions,

    /// Wake-up protocol options
    pub wake: wake::Options,

    /// Retry envelope options
    pub retry: retry::Options,
}

impl AppOptions {
    /// Derive options from the settings file contents
    pub fn from_settings(settings: &Settings, layout: &StorageLayout) -> Self {
        let timeout = Duration::from_secs(settings.fleet.timeout_secs);

        Self {
            secrets_file: settings
                .secrets_file
                .clone()
                .unwrap_or_else(|| layout.secrets_file().path().to_path_buf()),
            scratch_dir: settings
                .scratch_dir
                .clone()
                .unwrap_or_else(|| Dir::scratch().path().to_path_buf()),
            token_url: settings.fleet.auth_url.clone(),
            token_timeout: timeout,
            fleet: FleetOptions {
                base_url: settings.fleet.effective_base_url(),
                command_base_url: settings.fleet.command_proxy_url.clone(),
                timeout,
            },
            wake: wake::Options {
                poll_interval: Duration::from_secs(settings.wake.poll_interval_secs),
                round_timeout: Duration::from_secs(settings.wake.round_timeout_secs),
                max_rounds: settings.wake.max_rounds,
            },
            retry: retry::Options {
                max_attempts: settings.retry.max_attempts,
                cooldown: CooldownOptions {
                    base_delay: Duration::from_secs(settings.retry.base_delay_secs),
                    multiplier: settings.retry.multiplier,
                    ..CooldownOptions::default()
                },
            },
        }
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), &StorageLayout::default())
    }
}
