//! Application state shared by every handler.

use imgpress_core::Config;
use imgpress_processing::CompressionPipeline;
use imgpress_storage::{CompressedArea, UploadArea};

/// Built once at startup and handed to handlers through axum `State`.
pub struct AppState {
    pub config: Config,
    pub uploads: UploadArea,
    pub pipeline: CompressionPipeline,
}

impl AppState {
    pub fn new(config: Config, uploads: UploadArea, pipeline: CompressionPipeline) -> Self {
        AppState {
            config,
            uploads,
            pipeline,
        }
    }

    pub fn compressed(&self) -> &CompressedArea {
        self.pipeline.output()
    }
}
