//! Compression pipeline: ingest, optional resize, encode, persist.
//!
//! The blocking stages run on tokio's blocking pool while holding a [`CodecLease`].
//! The cancellation token is checked between stages; once it fires the job stops at
//! the next boundary and nothing is persisted. A job dropped while its output is being
//! written has that output deleted by the output area.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use imgpress_core::{AppError, EncoderId, ImageFormat, Quality, ResizeDirective};
use imgpress_storage::{CompressedArea, StorageError, StoredOutput};
use tokio_util::sync::CancellationToken;

use crate::codec::{CodecError, EncodedImage, ImageCodec};
use crate::pool::CodecPool;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The uploaded source could not be read back
    #[error("Failed to read source {path}: {source}")]
    Ingest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Compression cancelled")]
    Cancelled,

    #[error("Compression task failed: {0}")]
    Join(String),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Ingest { ref source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                AppError::SourceUnavailable(err.to_string())
            }
            other => AppError::Codec(other.to_string()),
        }
    }
}

/// One compression job.
#[derive(Debug, Clone)]
pub struct CompressionRequest {
    pub source_path: PathBuf,
    /// Server-assigned upload name; the output keeps its stem
    pub upload_name: String,
    pub original_filename: String,
    pub original_size: u64,
    pub target: ImageFormat,
    pub quality: Quality,
    pub resize: Option<ResizeDirective>,
}

#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub encoder: EncoderId,
    pub size: u64,
    pub quality: Quality,
    pub output: StoredOutput,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone)]
pub struct CompressionPipeline {
    codec: Arc<dyn ImageCodec>,
    pool: CodecPool,
    output: CompressedArea,
}

impl CompressionPipeline {
    pub fn new(codec: Arc<dyn ImageCodec>, pool: CodecPool, output: CompressedArea) -> Self {
        CompressionPipeline {
            codec,
            pool,
            output,
        }
    }

    pub fn pool(&self) -> &CodecPool {
        &self.pool
    }

    pub fn output(&self) -> &CompressedArea {
        &self.output
    }

    #[tracing::instrument(
        skip(self, request, cancel),
        fields(
            upload = %request.upload_name,
            target = %request.target,
            quality = request.quality.value(),
        )
    )]
    pub async fn run(
        &self,
        request: CompressionRequest,
        cancel: CancellationToken,
    ) -> Result<CompressionResult, PipelineError> {
        let start = Instant::now();

        let source = tokio::fs::read(&request.source_path)
            .await
            .map_err(|source| PipelineError::Ingest {
                path: request.source_path.clone(),
                source,
            })?;

        let lease = self
            .pool
            .acquire(&cancel)
            .await
            .ok_or(PipelineError::Cancelled)?;

        let codec = Arc::clone(&self.codec);
        let encoder = request.target.encoder();
        let quality = request.quality;
        let resize = request.resize;
        let token = cancel.clone();

        let encoded = tokio::task::spawn_blocking(move || {
            let _lease = lease;
            encode_blocking(codec.as_ref(), &source, resize, encoder, quality, &token)
        })
        .await
        .map_err(|e| PipelineError::Join(e.to_string()))??;

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let output = self
            .output
            .persist(&request.upload_name, encoder.extension(), encoded.data.clone())
            .await?;

        tracing::info!(
            encoder = %encoder,
            size_before = request.original_size,
            size_after = encoded.size(),
            width = encoded.width,
            height = encoded.height,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Compression finished"
        );

        Ok(CompressionResult {
            encoder: encoded.encoder,
            size: encoded.size(),
            quality: encoded.quality,
            output,
            width: encoded.width,
            height: encoded.height,
        })
    }
}

fn encode_blocking(
    codec: &dyn ImageCodec,
    source: &[u8],
    resize: Option<ResizeDirective>,
    encoder: EncoderId,
    quality: Quality,
    cancel: &CancellationToken,
) -> Result<EncodedImage, PipelineError> {
    let mut img = codec.ingest(source)?;
    if cancel.is_cancelled() {
        return Err(PipelineError::Cancelled);
    }

    if let Some(directive) = resize {
        img = codec.preprocess(img, &directive)?;
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
    }

    Ok(codec.encode(&img, encoder, quality)?)
}
