//! Local staging area for uploads on their way to object storage.
//!
//! Files are named `{unix_millis}_{sanitized filename}`. Two uploads with the
//! same name in the same millisecond share a path.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::storage::sanitize_filename;

/// Process-wide directory buffering uploaded files.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    /// Create a staging area rooted at `dir`. The directory is created lazily.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Staging directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `data` to a fresh staging file.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the file cannot be written.
    pub async fn stage(&self, filename: &str, data: &[u8]) -> io::Result<StagedFile> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(format!(
            "{}_{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(filename)
        ));
        tokio::fs::write(&path, data).await?;
        debug!(path = %path.display(), bytes = data.len(), "Staged upload");

        Ok(StagedFile { path })
    }
}

/// A file sitting in the staging area.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    /// Location on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the staged bytes back.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    /// Delete the staged copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    pub async fn remove(self) -> io::Result<()> {
        tokio::fs::remove_file(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_staging() -> StagingArea {
        StagingArea::new(
            std::env::temp_dir().join(format!("noticeboard-staging-{}", uuid::Uuid::new_v4())),
        )
    }

    #[tokio::test]
    async fn test_stage_read_remove() {
        let staging = temp_staging();

        let staged = staging.stage("photo 1.jpg", b"jpeg").await.unwrap();
        let name = staged.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("_photo_1.jpg"));
        assert!(staged.path().starts_with(staging.dir()));
        assert_eq!(staged.read().await.unwrap(), b"jpeg");

        let path = staged.path().to_path_buf();
        staged.remove().await.unwrap();
        assert!(!path.exists());

        let _ = std::fs::remove_dir_all(staging.dir());
    }

    #[tokio::test]
    async fn test_stage_creates_directory() {
        let staging = temp_staging();
        assert!(!staging.dir().exists());

        let staged = staging.stage("a.png", b"x").await.unwrap();
        assert!(staging.dir().is_dir());

        staged.remove().await.unwrap();
        let _ = std::fs::remove_dir_all(staging.dir());
    }
}
