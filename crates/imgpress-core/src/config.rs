//! Configuration module
//!
//! Settings are read from the environment (a `.env` file is honoured) once at
//! process start and handed to the rest of the application as an immutable `Config`.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::DEFAULT_COMPRESSION_TIMEOUT_SECS;

const DEVELOPMENT_PORT: u16 = 3000;
const PRODUCTION_PORT: u16 = 80;
const MAX_UPLOAD_SIZE_MB: usize = 20;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    /// Public base URL, without trailing slash
    pub base_url: String,
    pub cors_origins: Vec<String>,
}

/// Upload and codec settings
#[derive(Clone, Debug)]
pub struct CompressionConfig {
    pub upload_dir: PathBuf,
    pub compressed_dir: PathBuf,
    /// Per-request budget covering upload receipt and compression
    pub timeout: Duration,
    pub max_upload_size_bytes: usize,
    /// Size of the codec pool
    pub max_concurrent_compressions: usize,
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base: BaseConfig,
    pub compression: CompressionConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<GatewayConfig>);

impl Config {
    pub fn new(base: BaseConfig, compression: CompressionConfig) -> Self {
        Config(Box::new(GatewayConfig { base, compression }))
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());
        let is_production = is_production_name(&environment);

        let default_port = if environment.eq_ignore_ascii_case("development") {
            DEVELOPMENT_PORT
        } else {
            PRODUCTION_PORT
        };
        let server_port: u16 = match env::var("PORT") {
            Ok(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            Err(_) => default_port,
        };

        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port))
            .trim_end_matches('/')
            .to_string();

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let timeout_secs = env::var("COMPRESSION_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_COMPRESSION_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .unwrap_or(DEFAULT_COMPRESSION_TIMEOUT_SECS);

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let default_pool_size = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(2);
        let max_concurrent_compressions = env::var("MAX_CONCURRENT_COMPRESSIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default_pool_size);

        let base = BaseConfig {
            server_port,
            environment,
            base_url,
            cors_origins,
        };

        let compression = CompressionConfig {
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "public/uploads".to_string())
                .into(),
            compressed_dir: env::var("COMPRESSED_DIR")
                .unwrap_or_else(|_| "public/compressed".to_string())
                .into(),
            timeout: Duration::from_secs(timeout_secs),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            max_concurrent_compressions,
        };

        let config = Config::new(base, compression);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let compression = &self.0.compression;

        if compression.timeout.is_zero() {
            return Err(anyhow::anyhow!("COMPRESSION_TIMEOUT_SECS cannot be 0"));
        }

        if compression.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
        }

        if compression.max_concurrent_compressions == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_COMPRESSIONS cannot be 0"));
        }

        if compression.upload_dir == compression.compressed_dir {
            return Err(anyhow::anyhow!(
                "UPLOAD_DIR and COMPRESSED_DIR must point to different directories"
            ));
        }

        let base_url = &self.0.base.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "BASE_URL must start with http:// or https:// (got '{}')",
                base_url
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.0.base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.0.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.0.base.environment
    }

    pub fn base_url(&self) -> &str {
        &self.0.base.base_url
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.0.base.cors_origins
    }

    pub fn upload_dir(&self) -> &Path {
        &self.0.compression.upload_dir
    }

    pub fn compressed_dir(&self) -> &Path {
        &self.0.compression.compressed_dir
    }

    pub fn compression_timeout(&self) -> Duration {
        self.0.compression.timeout
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.0.compression.max_upload_size_bytes
    }

    pub fn max_concurrent_compressions(&self) -> usize {
        self.0.compression.max_concurrent_compressions
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}
