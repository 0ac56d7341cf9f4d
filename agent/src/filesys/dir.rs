//! Directory operations

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::errors::ToggleError;
use crate::filesys::file::File;

/// A directory wrapper with path
#[derive(Debug, Clone)]
pub struct Dir {
    path: PathBuf,
}

impl Dir {
    /// Create a new directory reference
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory (and parents)
    pub async fn create(&self) -> Result<(), ToggleError> {
        fs::create_dir_all(&self.path).await?;
        Ok(())
    }

    /// Get a file within this directory
    pub fn file(&self, name: &str) -> File {
        File::new(self.path.join(name))
    }

    /// Scratch directory for short-lived files
    ///
    /// Serverless hosts only allow writes under `/tmp`; elsewhere a local
    /// `./tmp` keeps scratch files next to the working directory.
    pub fn scratch() -> Dir {
        if std::env::var_os("LAMBDA_TASK_ROOT").is_some() {
            Dir::new("/tmp")
        } else {
            Dir::new("./tmp")
        }
    }
}
