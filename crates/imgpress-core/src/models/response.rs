use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned for a successful compression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompressResponse {
    /// Always 200
    pub code: u16,
    /// Size of the uploaded file in bytes
    pub file_size_before: u64,
    /// Size of the encoded file in bytes
    pub file_size_after: u64,
    /// Quality the encoder actually used
    pub quality: u8,
    /// Size reduction in percent, rounded to the nearest integer. Negative when the output grew.
    pub compressed: i64,
    /// Public URL of the compressed file
    pub url: String,
}

/// Body returned for every failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

/// `100 - round(after / before * 100)`, rounding half away from zero.
///
/// An empty source reports 0 instead of dividing by zero.
pub fn compression_percentage(before: u64, after: u64) -> i64 {
    if before == 0 {
        return 0;
    }
    let ratio = after as f64 / before as f64 * 100.0;
    100 - ratio.round() as i64
}
