//! Upload holding area.
//!
//! Every request streams its file into a uniquely named [`TempUpload`]. The guard
//! owns the path: [`TempUpload::remove`] consumes it, so the file is deleted exactly
//! once, and dropping a guard that was never removed deletes the file synchronously.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{StorageError, StorageResult};
use crate::keys::{generate_upload_name, validate_filename};

/// Directory holding in-flight uploads.
#[derive(Clone, Debug)]
pub struct UploadArea {
    base_path: PathBuf,
}

impl UploadArea {
    /// Create the area, creating the directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(UploadArea { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Open a new uniquely named file for the upload of `original_filename`.
    pub async fn begin(&self, original_filename: &str) -> StorageResult<UploadWriter> {
        let filename = generate_upload_name(original_filename);
        validate_filename(&filename)?;
        let path = self.base_path.join(&filename);

        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        tracing::debug!(path = %path.display(), original = %original_filename, "Upload started");

        Ok(UploadWriter {
            upload: TempUpload {
                path: Some(path),
                filename,
                original_filename: original_filename.to_string(),
                size: 0,
            },
            file,
        })
    }

    /// Delete every regular file left in the area, e.g. after a crash. Returns how many were removed.
    pub async fn purge_stale(&self) -> StorageResult<usize> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(
                    path = %entry.path().display(),
                    error = %e,
                    "Failed to purge stale upload"
                ),
            }
        }

        if removed > 0 {
            tracing::info!(removed, dir = %self.base_path.display(), "Purged stale uploads");
        }

        Ok(removed)
    }
}

/// Upload still being received.
pub struct UploadWriter {
    upload: TempUpload,
    file: fs::File,
}

impl UploadWriter {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> StorageResult<()> {
        self.file.write_all(chunk).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                self.upload.display(),
                e
            ))
        })?;
        self.upload.size += chunk.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.upload.size
    }

    /// Flush the file and hand over the completed upload.
    pub async fn finish(mut self) -> StorageResult<TempUpload> {
        if let Err(e) = self.file.flush().await {
            self.upload.remove().await;
            return Err(StorageError::UploadFailed(e.to_string()));
        }
        Ok(self.upload)
    }

    /// Give up on the upload and delete what was written so far.
    pub async fn abort(self) {
        self.upload.remove().await;
    }
}

/// A file in the upload holding area, owned by exactly one request.
#[derive(Debug)]
pub struct TempUpload {
    /// `None` once the file has been removed
    path: Option<PathBuf>,
    filename: String,
    original_filename: String,
    size: u64,
}

impl TempUpload {
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Server-assigned unique name inside the holding area.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Name the client sent.
    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    /// Size in bytes of the received file.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Check the file can be opened for reading.
    pub async fn ensure_readable(&self) -> StorageResult<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| StorageError::NotFound(self.filename.clone()))?;
        fs::File::open(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(path.display().to_string())
            } else {
                StorageError::IoError(e)
            }
        })?;
        Ok(())
    }

    /// Delete the file. Consumes the guard, so it cannot run twice.
    ///
    /// Failures are logged, never returned: the response must not depend on cleanup.
    pub async fn remove(mut self) {
        let Some(path) = self.path.take() else {
            return;
        };

        match fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Temp upload removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Temp upload already gone");
            }
            Err(e) => tracing::error!(
                path = %path.display(),
                error = %e,
                "Failed to remove temp upload"
            ),
        }
    }

    fn display(&self) -> String {
        self.path().display().to_string()
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            tracing::warn!(path = %path.display(), "Temp upload dropped without removal, deleting");
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::error!(path = %path.display(), error = %e, "Failed to remove temp upload");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn area() -> (TempDir, UploadArea) {
        let dir = TempDir::new().unwrap();
        let area = UploadArea::new(dir.path().join("uploads")).await.unwrap();
        (dir, area)
    }

    #[tokio::test]
    async fn test_write_finish_remove() {
        let (_dir, area) = area().await;

        let mut writer = area.begin("photo.jpg").await.unwrap();
        writer.write_chunk(b"hello ").await.unwrap();
        writer.write_chunk(b"world").await.unwrap();
        assert_eq!(writer.bytes_written(), 11);

        let upload = writer.finish().await.unwrap();
        assert_eq!(upload.size(), 11);
        assert_eq!(upload.original_filename(), "photo.jpg");
        assert!(upload.filename().ends_with("_photo.jpg"));
        let path = upload.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
        assert!(upload.ensure_readable().await.is_ok());

        upload.remove().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_abort_deletes_partial_file() {
        let (_dir, area) = area().await;

        let mut writer = area.begin("big.png").await.unwrap();
        writer.write_chunk(&[0u8; 128]).await.unwrap();
        writer.abort().await;

        assert_eq!(std::fs::read_dir(area.base_path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_drop_fallback_deletes_file() {
        let (_dir, area) = area().await;

        let upload = area.begin("a.webp").await.unwrap().finish().await.unwrap();
        let path = upload.path().to_path_buf();
        assert!(path.exists());

        drop(upload);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_tolerates_missing_file() {
        let (_dir, area) = area().await;

        let upload = area.begin("a.webp").await.unwrap().finish().await.unwrap();
        std::fs::remove_file(upload.path()).unwrap();
        assert!(matches!(
            upload.ensure_readable().await,
            Err(StorageError::NotFound(_))
        ));
        upload.remove().await;
    }

    #[tokio::test]
    async fn test_purge_stale() {
        let (_dir, area) = area().await;
        std::fs::write(area.base_path().join("old-1.jpg"), b"x").unwrap();
        std::fs::write(area.base_path().join("old-2.png"), b"y").unwrap();
        std::fs::create_dir(area.base_path().join("nested")).unwrap();

        assert_eq!(area.purge_stale().await.unwrap(), 2);
        assert_eq!(std::fs::read_dir(area.base_path()).unwrap().count(), 1);
    }
}
