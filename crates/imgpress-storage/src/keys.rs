//! Shared filename generation for both storage areas.
//!
//! Upload names have the form `{unix_millis}-{random}_{sanitized original name}`.
//! Output names reuse the upload name's stem with the encoder's extension.

use std::path::Path;

use rand::Rng;

use crate::error::{StorageError, StorageResult};

const RANDOM_SUFFIX_BOUND: u32 = 1_000_000_000;

/// Generate a collision-resistant holding-area filename for `original`.
pub fn generate_upload_name(original: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = rand::rng().random_range(0..RANDOM_SUFFIX_BOUND);
    format!("{}-{}_{}", millis, suffix, sanitize_original(original))
}

/// Strip directory components and replace spaces so the name is safe to embed.
pub fn sanitize_original(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() || c.is_control() { '_' } else { c })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Output filename: the upload name without its extension, plus `extension`.
pub fn output_name(upload_name: &str, extension: &str) -> String {
    let stem = Path::new(upload_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(upload_name);
    format!("{}.{}", stem, extension)
}

/// Reject anything that could escape the area directory.
pub fn validate_filename(filename: &str) -> StorageResult<()> {
    if filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0'])
    {
        return Err(StorageError::InvalidKey(filename.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_name_is_unique_and_keeps_original() {
        let a = generate_upload_name("my cat.jpg");
        let b = generate_upload_name("my cat.jpg");
        assert_ne!(a, b);
        assert!(a.ends_with("_my_cat.jpg"));
        assert!(validate_filename(&a).is_ok());
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_original("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_original("C:\\photos\\a b.png"), "a_b.png");
        assert_eq!(sanitize_original(""), "upload");
        assert_eq!(sanitize_original(".."), "upload");
    }

    #[test]
    fn test_output_name_replaces_last_extension() {
        assert_eq!(output_name("1-2_cat.jpg", "webp"), "1-2_cat.webp");
        assert_eq!(output_name("1-2_my.cat.png", "jpg"), "1-2_my.cat.jpg");
    }

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("a.jpg").is_ok());
        assert!(validate_filename("../a.jpg").is_err());
        assert!(validate_filename("x/a.jpg").is_err());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename("1-2_my..cat.jpg").is_ok());
    }
}
