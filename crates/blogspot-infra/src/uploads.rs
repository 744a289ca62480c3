//! Header-image upload storage.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

/// Directory-backed store for uploaded header images.
///
/// Files live flat under `root` and are served under the public `/uploads`
/// prefix; the stored post carries the public path, not the filesystem one.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Ensure the backing directory exists.
    pub async fn init(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy a spooled upload into the store, returning its public path.
    pub async fn store(&self, src: &Path, file_name: &str) -> io::Result<String> {
        let dest = self.root.join(file_name);
        fs::copy(src, &dest).await?;
        Ok(format!("/uploads/{file_name}"))
    }

    /// Remove a previously stored file by its public path.
    /// A file that is already gone is not an error.
    pub async fn remove(&self, public_path: &str) -> io::Result<()> {
        let name = public_path.rsplit('/').next().unwrap_or(public_path);
        match fs::remove_file(self.root.join(name)).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
