//! Shared constants.

/// Extensions accepted both as upload source and as conversion target.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "jxl"];

/// Quality used when the client sends none, garbage, or a value outside 1..=100.
pub const DEFAULT_QUALITY: u8 = 100;

/// Multipart field carrying the uploaded file.
pub const IMAGE_FIELD: &str = "image";

/// URL prefix under which the compressed-output area is served.
pub const COMPRESSED_PUBLIC_PATH: &str = "/public/compressed";

pub const DEFAULT_COMPRESSION_TIMEOUT_SECS: u64 = 35;
