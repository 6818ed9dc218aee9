//! Storage setup and initialization

use anyhow::{Context, Result};
use imgpress_core::constants::COMPRESSED_PUBLIC_PATH;
use imgpress_core::Config;
use imgpress_storage::{CompressedArea, UploadArea};

/// Create both directories and clear uploads left behind by a previous run.
pub async fn setup_storage(config: &Config) -> Result<(UploadArea, CompressedArea)> {
    let uploads = UploadArea::new(config.upload_dir())
        .await
        .context("Failed to initialize upload area")?;

    let purged = uploads
        .purge_stale()
        .await
        .context("Failed to purge stale uploads")?;

    let public_url = format!("{}{}", config.base_url(), COMPRESSED_PUBLIC_PATH);
    let compressed = CompressedArea::new(config.compressed_dir(), public_url)
        .await
        .context("Failed to initialize compressed-output area")?;

    tracing::info!(
        uploads = %uploads.base_path().display(),
        compressed = %compressed.base_path().display(),
        purged,
        "Storage initialized"
    );

    Ok((uploads, compressed))
}
