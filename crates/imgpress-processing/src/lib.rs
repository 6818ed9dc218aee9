//! imgpress Processing Library
//!
//! Parameter validation, the codec adapter around the image crates, the codec
//! pool that bounds concurrent codec work, and the pipeline that runs one
//! compression request end to end.

pub mod codec;
pub mod compression;
pub mod decode;
pub mod pipeline;
pub mod pool;
pub mod resize;
pub mod validator;

pub use codec::{CodecError, EncodedImage, ImageCodec, StandardCodec};
pub use pipeline::{CompressionPipeline, CompressionRequest, CompressionResult, PipelineError};
pub use pool::{CodecLease, CodecPool};
pub use validator::{resolve_target_format, validate_source_format, ValidationError};
