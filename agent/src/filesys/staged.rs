//! Scoped staging of sensitive files
//!
//! A [`StagedFile`] exists on disk exactly as long as the value lives. The file
//! is removed when the guard is dropped, whichever way the owning scope exits.

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::errors::ToggleError;
use crate::filesys::dir::Dir;
use crate::utils::generate_uuid;

/// A file removed from disk on drop
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    /// Write `contents` to a fresh, uniquely named, owner-only file in `dir`
    pub async fn stage(dir: &Dir, prefix: &str, contents: &SecretString) -> Result<Self, ToggleError> {
        dir.create().await?;
        let file = dir.file(&format!("{}-{}.pem", prefix, generate_uuid()));

        if let Err(e) = file.create_private(contents.expose_secret().as_bytes()).await {
            // a partial write must not leave key material behind
            if !matches!(&e, ToggleError::IoError(io) if io.kind() == std::io::ErrorKind::AlreadyExists) {
                let _ = std::fs::remove_file(file.path());
            }
            return Err(e);
        }

        debug!("Staged {}", file.path().display());
        Ok(Self {
            path: file.path().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
