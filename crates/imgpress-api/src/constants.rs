/// Service name reported in logs and the OpenAPI document
pub const SERVICE_NAME: &str = "imgpress";

pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Headroom on top of the file limit for multipart boundaries and the text fields
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
