//! Upload parameter validation.
//!
//! The checks here run in the order the handler applies them: the upload's own
//! extension first, then the requested conversion target.

use imgpress_core::error::{MSG_FORMAT_UNAVAILABLE, MSG_UNSUPPORTED_FORMAT};
use imgpress_core::{AppError, ImageFormat};
use std::path::Path;

/// Validation failures for an upload
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Image field missing")]
    MissingImage,

    #[error("Unsupported upload extension: {extension:?} (allowed: {allowed:?})")]
    UnsupportedFormat {
        extension: Option<String>,
        allowed: &'static [&'static str],
    },

    #[error("Unsupported target format: {requested} (allowed: {allowed:?})")]
    FormatUnavailable {
        requested: String,
        allowed: &'static [&'static str],
    },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let message = match err {
            ValidationError::MissingImage => imgpress_core::error::MSG_IMAGE_REQUIRED,
            ValidationError::UnsupportedFormat { .. } => MSG_UNSUPPORTED_FORMAT,
            ValidationError::FormatUnavailable { .. } => MSG_FORMAT_UNAVAILABLE,
        };
        AppError::Validation(message.to_string())
    }
}

/// Source format of the upload, from the real extension of the client's filename.
pub fn validate_source_format(original_filename: &str) -> Result<ImageFormat, ValidationError> {
    ImageFormat::from_filename(original_filename).ok_or_else(|| {
        ValidationError::UnsupportedFormat {
            extension: extension_of(original_filename),
            allowed: ImageFormat::supported_extensions(),
        }
    })
}

/// Output format for the request.
///
/// A missing or blank `convert_to` falls back to the upload's own extension.
pub fn resolve_target_format(
    convert_to: Option<&str>,
    original_filename: &str,
) -> Result<ImageFormat, ValidationError> {
    let requested = match convert_to.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value.to_string(),
        None => extension_of(original_filename).unwrap_or_default(),
    };

    ImageFormat::parse(&requested).ok_or(ValidationError::FormatUnavailable {
        requested,
        allowed: ImageFormat::supported_extensions(),
    })
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_accepts_supported() {
        assert_eq!(validate_source_format("a.jpg"), Ok(ImageFormat::Jpeg));
        assert_eq!(validate_source_format("a.JPEG"), Ok(ImageFormat::Jpeg));
        assert_eq!(validate_source_format("a.png"), Ok(ImageFormat::Png));
        assert_eq!(validate_source_format("a.webp"), Ok(ImageFormat::Webp));
        assert_eq!(validate_source_format("a.jxl"), Ok(ImageFormat::Jxl));
    }

    #[test]
    fn test_source_format_rejects_gif() {
        let err = validate_source_format("anim.gif").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnsupportedFormat { extension: Some(ref e), .. } if e == "gif"
        ));
        assert!(validate_source_format("README").is_err());
    }

    #[test]
    fn test_target_defaults_to_source_extension() {
        assert_eq!(resolve_target_format(None, "a.webp"), Ok(ImageFormat::Webp));
        assert_eq!(resolve_target_format(Some("  "), "a.PNG"), Ok(ImageFormat::Png));
    }

    #[test]
    fn test_target_is_case_insensitive() {
        assert_eq!(resolve_target_format(Some("JXL"), "a.jpg"), Ok(ImageFormat::Jxl));
        assert_eq!(resolve_target_format(Some("Jpg"), "a.png"), Ok(ImageFormat::Jpeg));
    }

    #[test]
    fn test_target_rejects_bmp() {
        let err = resolve_target_format(Some("bmp"), "a.jpg").unwrap_err();
        assert!(matches!(err, ValidationError::FormatUnavailable { ref requested, .. } if requested == "bmp"));
    }

    #[test]
    fn test_into_app_error_messages() {
        let err: AppError = ValidationError::FormatUnavailable {
            requested: "bmp".to_string(),
            allowed: ImageFormat::supported_extensions(),
        }
        .into();
        assert_eq!(err.to_string(), format!("Invalid input: {}", MSG_FORMAT_UNAVAILABLE));

        let err: AppError = ValidationError::MissingImage.into();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Image is required"));
    }
}
