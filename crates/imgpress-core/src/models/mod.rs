//! Domain models for a single compression request.

pub mod format;
pub mod quality;
pub mod resize;
pub mod response;

pub use format::{EncoderId, ImageFormat};
pub use quality::Quality;
pub use resize::{ResizeDirective, MAX_DIMENSION};
pub use response::{compression_percentage, CompressResponse, ErrorBody};
