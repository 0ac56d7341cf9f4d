//! Secret store backends

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::errors::ToggleError;
use crate::filesys::file::File;

/// Secret store trait for testability
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the named values; names that are not stored are simply absent
    async fn get_many(&self, names: &[&str]) -> Result<HashMap<String, SecretString>, ToggleError>;

    /// Store or replace one value
    async fn put(&self, name: &str, value: &SecretString) -> Result<(), ToggleError>;
}

/// Secrets kept as a flat JSON object in a single owner-only file
pub struct FileSecretStore {
    file: File,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileSecretStore {
    pub fn new(file: File) -> Self {
        Self {
            file,
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<HashMap<String, String>, ToggleError> {
        if !self.file.exists().await {
            return Err(ToggleError::ConfigError(format!(
                "Secrets file {} does not exist",
                self.file.path().display()
            )));
        }
        self.file.read_json().await.map_err(|e| {
            ToggleError::ConfigError(format!(
                "Failed to read secrets file {}: {}",
                self.file.path().display(),
                e
            ))
        })
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_many(&self, names: &[&str]) -> Result<HashMap<String, SecretString>, ToggleError> {
        let mut stored = self.load().await?;
        debug!("Loaded {} entries from {}", stored.len(), self.file.path().display());

        Ok(names
            .iter()
            .filter_map(|name| {
                stored
                    .remove(*name)
                    .map(|value| (name.to_string(), SecretString::from(value)))
            })
            .collect())
    }

    async fn put(&self, name: &str, value: &SecretString) -> Result<(), ToggleError> {
        let _guard = self.write_lock.lock().await;
        let mut stored = self.load().await?;
        stored.insert(name.to_string(), value.expose_secret().to_string());
        self.file.write_json_private(&stored).await
    }
}

/// In-memory store, used by tests and dry runs
#[derive(Default)]
pub struct MemorySecretStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemorySecretStore {
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: Mutex::new(values.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
            fail_writes: false,
        }
    }

    /// Make every `put` fail
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Current plain value of `name`
    pub fn value(&self, name: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_many(&self, names: &[&str]) -> Result<HashMap<String, SecretString>, ToggleError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(names
            .iter()
            .filter_map(|name| {
                values
                    .get(*name)
                    .map(|value| (name.to_string(), SecretString::from(value.clone())))
            })
            .collect())
    }

    async fn put(&self, name: &str, value: &SecretString) -> Result<(), ToggleError> {
        if self.fail_writes {
            return Err(ToggleError::Internal("secret store is read-only".to_string()));
        }
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), value.expose_secret().to_string());
        Ok(())
    }
}
