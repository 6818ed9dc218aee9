//! imgpress Core Library
//!
//! This crate provides the configuration, error taxonomy and domain models
//! shared by every imgpress component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, CompressionConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    CompressResponse, EncoderId, ErrorBody, ImageFormat, Quality, ResizeDirective,
};
