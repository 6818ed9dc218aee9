//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use anyhow::{Context, Result};
use imgpress_core::Config;
use imgpress_infra::LogFormat;
use imgpress_processing::{CodecPool, CompressionPipeline, ImageCodec, StandardCodec};

use crate::constants::{SERVICE_NAME, SERVICE_VERSION};
use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    imgpress_infra::init_telemetry(
        SERVICE_NAME,
        SERVICE_VERSION,
        LogFormat::for_environment(config.environment()),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!(environment = %config.environment(), "Configuration loaded and validated");

    let state = build_state(&config, Arc::new(StandardCodec)).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Create the storage areas and the compression pipeline around `codec`.
pub async fn build_state(config: &Config, codec: Arc<dyn ImageCodec>) -> Result<Arc<AppState>> {
    let (uploads, compressed) = storage::setup_storage(config).await?;

    let pool = CodecPool::new(config.max_concurrent_compressions());
    tracing::info!(
        capacity = pool.capacity(),
        timeout_secs = config.compression_timeout().as_secs_f64(),
        "Codec pool ready"
    );

    let pipeline = CompressionPipeline::new(codec, pool, compressed);
    Ok(Arc::new(AppState::new(config.clone(), uploads, pipeline)))
}
