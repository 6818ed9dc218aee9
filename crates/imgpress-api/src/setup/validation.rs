//! Configuration validation
//!
//! Validates configuration at startup to catch misconfigurations early.

use anyhow::Result;
use imgpress_core::Config;

/// Above this the per-request budget holds a connection open for too long
const LONG_TIMEOUT_SECS: u64 = 300;

/// Fail on invalid configuration, warn on configuration that works but looks wrong.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() {
        if config.base_url().starts_with("http://") {
            tracing::warn!(
                base_url = %config.base_url(),
                "BASE_URL uses plain http in production - download URLs will not be https"
            );
        }
        if config.base_url().contains("localhost") {
            tracing::warn!(
                base_url = %config.base_url(),
                "BASE_URL points at localhost in production"
            );
        }
    }

    if config.compression_timeout().as_secs() > LONG_TIMEOUT_SECS {
        tracing::warn!(
            timeout_secs = config.compression_timeout().as_secs(),
            "COMPRESSION_TIMEOUT_SECS is very high"
        );
    }

    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    if config.max_concurrent_compressions() > cpus * 4 {
        tracing::warn!(
            max_concurrent_compressions = config.max_concurrent_compressions(),
            cpus,
            "Codec pool is much larger than the CPU count - jobs will contend for cores"
        );
    }

    Ok(())
}
