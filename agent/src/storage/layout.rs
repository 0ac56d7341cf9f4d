//! Storage layout configuration

use std::path::PathBuf;

use crate::filesys::file::File;

/// Where the agent looks for its configuration files
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Base directory for all configuration
    pub base_dir: PathBuf,
}

impl StorageLayout {
    /// Create a new storage layout
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Get the settings file path
    pub fn settings_file(&self) -> File {
        File::new(self.base_dir.join("settings.json"))
    }

    /// Get the default secrets file path
    pub fn secrets_file(&self) -> File {
        File::new(self.base_dir.join("secrets.json"))
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        // Use /etc/sentry-toggle on Linux, or user home directory on other platforms
        #[cfg(target_os = "linux")]
        let base_dir = PathBuf::from("/etc/sentry-toggle");

        #[cfg(not(target_os = "linux"))]
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sentry-toggle");

        Self::new(base_dir)
    }
}

// Add dirs crate functionality inline for cross-platform support
#[cfg(not(target_os = "linux"))]
mod dirs {
    use std::path::PathBuf;

    pub fn home_dir() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
    }
}
