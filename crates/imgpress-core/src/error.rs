//! Error types module
//!
//! Every failure a compression request can end in is represented by `AppError`.
//! Each variant self-describes how it is presented to the client through the
//! `ErrorMetadata` trait, so the HTTP layer only has to render it.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like timeouts
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "CODEC_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether the client may retry the same request
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether internal details must stay out of the response
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

pub const MSG_IMAGE_REQUIRED: &str = "Image is required";
pub const MSG_UNSUPPORTED_FORMAT: &str = "Unsupported file format";
pub const MSG_FORMAT_UNAVAILABLE: &str = "Requested output format is not available";
pub const MSG_SOURCE_UNAVAILABLE: &str =
    "Compression failed, retry later or use a different image";
pub const MSG_CODEC_FAILED: &str = "Compression failed, please retry later";
pub const MSG_TIMEOUT: &str =
    "Unable to compress this image, retry later or use a different image";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Uploaded source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Upload not received within {0}s")]
    UploadTimeout(u64),

    #[error("Compression did not finish within {0}s")]
    CompressionTimeout(u64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::Validation(_) => (400, "INVALID_INPUT", false, false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Debug),
        AppError::SourceUnavailable(_) => {
            (503, "SOURCE_UNAVAILABLE", true, true, LogLevel::Warn)
        }
        AppError::Codec(_) => (503, "CODEC_ERROR", true, true, LogLevel::Error),
        AppError::UploadTimeout(_) => (408, "REQUEST_TIMEOUT", true, false, LogLevel::Warn),
        AppError::CompressionTimeout(_) => {
            (503, "COMPRESSION_TIMEOUT", true, false, LogLevel::Warn)
        }
        AppError::NotFound(_) => (404, "NOT_FOUND", false, false, LogLevel::Debug),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", true, true, LogLevel::Error)
        }
    }
}

impl AppError {
    /// Get error type name for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "ValidationError",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::SourceUnavailable(_) => "NotFoundError",
            AppError::Codec(_) => "CodecError",
            AppError::UploadTimeout(_) | AppError::CompressionTimeout(_) => "TimeoutError",
            AppError::NotFound(_) => "NotFound",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Full message including the source chain, for logs only.
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();
        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::SourceUnavailable(_) => MSG_SOURCE_UNAVAILABLE.to_string(),
            AppError::Codec(_) => MSG_CODEC_FAILED.to_string(),
            AppError::UploadTimeout(_) | AppError::CompressionTimeout(_) => {
                MSG_TIMEOUT.to_string()
            }
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
