//! Upload folder access
//!
//! One flat folder holds uploaded archives, their extracted contents and
//! generated notes archives. Filenames are joined onto the folder as given;
//! writers targeting the same name race and the last write wins.

use std::path::{Path, PathBuf};

use notebox_common::{Error, Result};
use tracing::debug;

/// Handle on the shared upload folder
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of `filename` inside the folder
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Write `bytes` under `filename`, replacing any existing file
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(filename);
        tokio::fs::write(&path, bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Path of an existing file, or `NotFound`
    pub async fn existing(&self, filename: &str) -> Result<PathBuf> {
        let path = self.path_for(filename);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(Error::NotFound(filename.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
