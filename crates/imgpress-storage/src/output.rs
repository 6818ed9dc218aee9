//! Compressed-output area.
//!
//! Finished files are written to a hidden partial name and renamed into place, so
//! a file under its public name is always complete.
//!
//! The write itself runs on its own task and always finishes. If the caller stops
//! waiting for it (its request timed out), the file is deleted as soon as it lands,
//! so an abandoned job leaves nothing behind.

use std::path::{Path, PathBuf};
use std::time::Instant;

use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use crate::error::{StorageError, StorageResult};
use crate::keys::{output_name, validate_filename};

/// A file persisted in the compressed-output area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOutput {
    pub filename: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Directory of finished files, served publicly under `base_url`.
#[derive(Clone, Debug)]
pub struct CompressedArea {
    base_path: PathBuf,
    base_url: String,
    /// Output writes and abandoned-output cleanups still running
    tasks: TaskTracker,
}

impl CompressedArea {
    /// Create the area, creating the directory if needed.
    ///
    /// # Arguments
    /// * `base_path` - Directory for finished files (e.g., "public/compressed")
    /// * `base_url` - URL the directory is served under (e.g., "http://localhost:3000/public/compressed")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create output directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(CompressedArea {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
            tasks: TaskTracker::new(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Public URL for a stored file
    pub fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url, filename)
    }

    /// Persist `data` as `<stem of upload_name>.<extension>`, replacing any previous file.
    ///
    /// Dropping the returned future before it resolves deletes the output once the
    /// write completes.
    pub async fn persist(
        &self,
        upload_name: &str,
        extension: &str,
        data: Bytes,
    ) -> StorageResult<StoredOutput> {
        let filename = output_name(upload_name, extension);
        validate_filename(&filename)?;

        let path = self.base_path.join(&filename);
        let partial = self.base_path.join(format!(".{}.partial", filename));

        let mut pending = PendingOutput {
            handle: Some(self.tasks.spawn(write_output(filename, path, partial, data))),
            tasks: self.tasks.clone(),
        };
        pending.wait().await
    }

    /// Wait for every output write and cleanup still in flight. Called on shutdown.
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
    }
}

async fn write_output(
    filename: String,
    path: PathBuf,
    partial: PathBuf,
    data: Bytes,
) -> StorageResult<StoredOutput> {
    let start = Instant::now();

    if let Err(e) = write_synced(&partial, &data).await {
        let _ = fs::remove_file(&partial).await;
        return Err(StorageError::WriteFailed(format!(
            "Failed to write file {}: {}",
            partial.display(),
            e
        )));
    }

    if let Err(e) = fs::rename(&partial, &path).await {
        let _ = fs::remove_file(&partial).await;
        return Err(StorageError::WriteFailed(format!(
            "Failed to move {} into place: {}",
            path.display(),
            e
        )));
    }

    tracing::info!(
        path = %path.display(),
        size_bytes = data.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Compressed output stored"
    );

    Ok(StoredOutput {
        filename,
        path,
        size: data.len() as u64,
    })
}

/// An output write whose result has not been collected yet.
struct PendingOutput {
    /// `None` once the result was collected
    handle: Option<JoinHandle<StorageResult<StoredOutput>>>,
    tasks: TaskTracker,
}

impl PendingOutput {
    async fn wait(&mut self) -> StorageResult<StoredOutput> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(StorageError::WriteFailed("Output already collected".to_string()));
        };
        let joined = handle.await;
        self.handle = None;
        joined.map_err(|e| StorageError::WriteFailed(format!("Output write task failed: {}", e)))?
    }
}

impl Drop for PendingOutput {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("Output write abandoned outside a runtime, file may remain");
            return;
        };

        self.tasks.spawn_on(
            async move {
                let Ok(Ok(stored)) = handle.await else {
                    return;
                };
                match fs::remove_file(&stored.path).await {
                    Ok(()) => tracing::info!(
                        path = %stored.path.display(),
                        "Abandoned output removed"
                    ),
                    Err(e) => tracing::error!(
                        path = %stored.path.display(),
                        error = %e,
                        "Failed to remove abandoned output"
                    ),
                }
            },
            &runtime,
        );
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    Ok(())
}
