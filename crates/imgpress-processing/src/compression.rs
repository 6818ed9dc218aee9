//! Encoders for every target format.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};
use imgpress_core::{EncoderId, Quality};
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;
use zune_core::options::EncoderOptions;
use zune_jpegxl::JxlSimpleEncoder;

use crate::codec::CodecError;

/// oxipng preset; 2 is the library's default speed/size trade-off
const OXIPNG_PRESET: u8 = 2;

/// libwebp rejects larger edges
pub const WEBP_MAX_DIMENSION: u32 = 16_383;

/// libjpeg's `JPEG_MAX_DIMENSION`
pub const JPEG_MAX_DIMENSION: u32 = 65_500;

pub struct ImageCompressor;

impl ImageCompressor {
    /// Encode `img` with the given encoder. PNG and JXL output is lossless and ignores `quality`.
    pub fn compress(
        img: &DynamicImage,
        encoder: EncoderId,
        quality: Quality,
    ) -> Result<Bytes, CodecError> {
        check_dimensions(img, encoder)?;

        let data = match encoder {
            EncoderId::MozJpeg => Self::compress_jpeg(img, quality)?,
            EncoderId::OxiPng => Self::compress_png(img)?,
            EncoderId::WebP => Self::compress_webp(img, quality)?,
            EncoderId::JxlLossless => Self::compress_jxl(img)?,
        };

        tracing::debug!(
            encoder = %encoder,
            quality = quality.value(),
            size_bytes = data.len(),
            "Image encoded"
        );

        Ok(data)
    }

    /// Compress to JPEG using mozjpeg
    fn compress_jpeg(img: &DynamicImage, quality: Quality) -> Result<Bytes, CodecError> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality.value() as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let encode = || -> std::io::Result<Vec<u8>> {
            let mut comp = comp.start_compress(Vec::new())?;
            comp.write_scanlines(&rgb_img)?;
            comp.finish()
        };

        encode()
            .map(Bytes::from)
            .map_err(|e| CodecError::Encode(format!("mozjpeg: {}", e)))
    }

    /// Compress to PNG, then optimize losslessly with oxipng
    fn compress_png(img: &DynamicImage) -> Result<Bytes, CodecError> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| CodecError::Encode(format!("png: {}", e)))?;

        let options = oxipng::Options::from_preset(OXIPNG_PRESET);
        let optimized = oxipng::optimize_from_memory(&buffer, &options)
            .map_err(|e| CodecError::Encode(format!("oxipng: {}", e)))?;

        Ok(Bytes::from(optimized))
    }

    /// Compress to WebP
    fn compress_webp(img: &DynamicImage, quality: Quality) -> Result<Bytes, CodecError> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder
            .encode_simple(false, quality.value() as f32)
            .map_err(|e| CodecError::Encode(format!("webp: {:?}", e)))?;

        Ok(Bytes::copy_from_slice(&webp_data))
    }

    /// Compress to lossless JPEG XL
    fn compress_jxl(img: &DynamicImage) -> Result<Bytes, CodecError> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let options = EncoderOptions::new(
            width as usize,
            height as usize,
            ColorSpace::RGBA,
            BitDepth::Eight,
        );
        let encoder = JxlSimpleEncoder::new(rgba_img.as_raw(), options);
        let jxl_data = encoder
            .encode()
            .map_err(|e| CodecError::Encode(format!("jxl: {:?}", e)))?;

        Ok(Bytes::from(jxl_data))
    }
}

/// Reject images the encoder cannot represent. libwebp and mozjpeg signal these by
/// panicking, so they must never reach the encoder.
fn check_dimensions(img: &DynamicImage, encoder: EncoderId) -> Result<(), CodecError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(CodecError::Encode("image has no pixels".to_string()));
    }

    let max = match encoder {
        EncoderId::WebP => WEBP_MAX_DIMENSION,
        EncoderId::MozJpeg => JPEG_MAX_DIMENSION,
        EncoderId::OxiPng | EncoderId::JxlLossless => return Ok(()),
    };

    if width > max || height > max {
        return Err(CodecError::Encode(format!(
            "{}: {}x{} exceeds the {} px limit",
            encoder, width, height, max
        )));
    }

    Ok(())
}
