//! File operations

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::errors::ToggleError;

/// A file wrapper with path
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    /// Create a new file reference
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists
    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }

    /// Read file contents as string
    pub async fn read_string(&self) -> Result<String, ToggleError> {
        let mut file = fs::File::open(&self.path).await?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).await?;
        Ok(contents)
    }

    /// Read file as JSON
    pub async fn read_json<T: DeserializeOwned>(&self) -> Result<T, ToggleError> {
        let contents = self.read_string().await?;
        let value = serde_json::from_str(&contents)?;
        Ok(value)
    }

    /// Write JSON to file, replacing it atomically with owner-only permissions
    pub async fn write_json_private<T: Serialize>(&self, value: &T) -> Result<(), ToggleError> {
        let contents = serde_json::to_string_pretty(value)?;
        self.write_atomic_private(contents.as_bytes()).await
    }

    /// Create the file with owner-read/write permissions (0o600 on Unix) and write `contents`
    ///
    /// Fails if the file already exists.
    pub async fn create_private(&self, contents: &[u8]) -> Result<(), ToggleError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        Ok(())
    }

    /// Delete the file
    pub async fn delete(&self) -> Result<(), ToggleError> {
        if self.exists().await {
            fs::remove_file(&self.path).await?;
        }
        Ok(())
    }

    /// Atomic write using a temporary file created with owner-only permissions
    async fn write_atomic_private(&self, contents: &[u8]) -> Result<(), ToggleError> {
        let temp = File::new(self.path.with_extension(format!("{}.tmp", crate::utils::generate_uuid())));
        temp.create_private(contents).await?;

        // Rename to target
        if let Err(e) = fs::rename(&temp.path, &self.path).await {
            let _ = temp.delete().await;
            return Err(e.into());
        }
        Ok(())
    }
}
