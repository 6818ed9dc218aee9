use std::fmt;
use std::path::Path;

use crate::constants::SUPPORTED_EXTENSIONS;

/// Image formats the gateway accepts as source and produces as output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
    Jxl,
}

impl ImageFormat {
    /// Parse a format name or extension, case-insensitive. `jpg` and `jpeg` are the same format.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::Webp),
            "jxl" => Some(ImageFormat::Jxl),
            _ => None,
        }
    }

    /// Format implied by the real extension of `filename` (the part after the last dot).
    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::parse)
    }

    /// Encoder that produces this format.
    pub fn encoder(self) -> EncoderId {
        match self {
            ImageFormat::Jpeg => EncoderId::MozJpeg,
            ImageFormat::Png => EncoderId::OxiPng,
            ImageFormat::Webp => EncoderId::WebP,
            ImageFormat::Jxl => EncoderId::JxlLossless,
        }
    }

    pub fn supported_extensions() -> &'static [&'static str] {
        SUPPORTED_EXTENSIONS
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
            ImageFormat::Jxl => "jxl",
        };
        f.write_str(name)
    }
}

/// Identifier of the concrete encoder behind a target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncoderId {
    /// Progressive, optimized-Huffman JPEG
    MozJpeg,
    /// Lossless PNG, re-optimized after encoding
    OxiPng,
    WebP,
    /// Lossless JPEG XL
    JxlLossless,
}

impl EncoderId {
    pub fn name(self) -> &'static str {
        match self {
            EncoderId::MozJpeg => "mozjpeg",
            EncoderId::OxiPng => "oxipng",
            EncoderId::WebP => "webp",
            EncoderId::JxlLossless => "jxl",
        }
    }

    /// Extension written to the compressed-output area.
    pub fn extension(self) -> &'static str {
        match self {
            EncoderId::MozJpeg => "jpg",
            EncoderId::OxiPng => "png",
            EncoderId::WebP => "webp",
            EncoderId::JxlLossless => "jxl",
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            EncoderId::MozJpeg => ImageFormat::Jpeg,
            EncoderId::OxiPng => ImageFormat::Png,
            EncoderId::WebP => ImageFormat::Webp,
            EncoderId::JxlLossless => ImageFormat::Jxl,
        }
    }
}

impl fmt::Display for EncoderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(ImageFormat::parse("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::parse("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::parse("WebP"), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::parse(" png "), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::parse("jxl"), Some(ImageFormat::Jxl));
        assert_eq!(ImageFormat::parse("bmp"), None);
        assert_eq!(ImageFormat::parse("gif"), None);
        assert_eq!(ImageFormat::parse(""), None);
    }

    #[test]
    fn test_from_filename_uses_real_extension() {
        assert_eq!(ImageFormat::from_filename("cat.PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_filename("my.photo.jpeg"), Some(ImageFormat::Jpeg));
        // substring matches do not count
        assert_eq!(ImageFormat::from_filename("jpg_lover.gif"), None);
        assert_eq!(ImageFormat::from_filename("png"), None);
        assert_eq!(ImageFormat::from_filename("noext"), None);
    }

    #[test]
    fn test_encoder_mapping() {
        assert_eq!(ImageFormat::Png.encoder().name(), "oxipng");
        assert_eq!(ImageFormat::Jpeg.encoder().name(), "mozjpeg");
        assert_eq!(ImageFormat::Webp.encoder().name(), "webp");
        assert_eq!(ImageFormat::Jxl.encoder().name(), "jxl");
        assert_eq!(ImageFormat::Jpeg.encoder().extension(), "jpg");
    }

    #[test]
    fn test_supported_extensions_all_parse() {
        for ext in ImageFormat::supported_extensions() {
            let format = ImageFormat::parse(ext).expect("supported extension parses");
            assert_eq!(format.encoder().format(), format);
        }
    }
}
