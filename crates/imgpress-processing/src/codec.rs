//! The codec seam.
//!
//! The pipeline only knows [`ImageCodec`]. [`StandardCodec`] is the production
//! implementation; tests substitute slow or recording codecs.

use bytes::Bytes;
use image::{DynamicImage, GenericImageView};
use imgpress_core::{EncoderId, Quality, ResizeDirective};

use crate::compression::ImageCompressor;
use crate::decode::decode_image;
use crate::resize::apply_resize;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to resize image: {0}")]
    Resize(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Encoded output of a compression job.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Bytes,
    pub encoder: EncoderId,
    pub quality: Quality,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Blocking image codec. Every call runs on a blocking thread holding a pool lease.
pub trait ImageCodec: Send + Sync {
    /// Decode source bytes into pixels.
    fn ingest(&self, data: &[u8]) -> Result<DynamicImage, CodecError>;

    /// Apply the resize directive before encoding.
    fn preprocess(
        &self,
        img: DynamicImage,
        resize: &ResizeDirective,
    ) -> Result<DynamicImage, CodecError>;

    fn encode(
        &self,
        img: &DynamicImage,
        encoder: EncoderId,
        quality: Quality,
    ) -> Result<EncodedImage, CodecError>;
}

/// Codec backed by the `image` crate, mozjpeg, oxipng, libwebp and zune-jpegxl.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardCodec;

impl ImageCodec for StandardCodec {
    fn ingest(&self, data: &[u8]) -> Result<DynamicImage, CodecError> {
        decode_image(data)
    }

    fn preprocess(
        &self,
        img: DynamicImage,
        resize: &ResizeDirective,
    ) -> Result<DynamicImage, CodecError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(CodecError::Resize("image has no pixels".to_string()));
        }
        Ok(apply_resize(img, resize))
    }

    fn encode(
        &self,
        img: &DynamicImage,
        encoder: EncoderId,
        quality: Quality,
    ) -> Result<EncodedImage, CodecError> {
        let data = ImageCompressor::compress(img, encoder, quality)?;
        let (width, height) = img.dimensions();
        Ok(EncodedImage {
            data,
            encoder,
            quality,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_standard_codec_end_to_end() {
        let codec = StandardCodec;
        let mut png = Vec::new();
        RgbaImage::from_pixel(200, 100, Rgba([1, 2, 3, 255]))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let img = codec.ingest(&png).unwrap();
        let img = codec
            .preprocess(img, &ResizeDirective { width: Some(50), height: None })
            .unwrap();
        let out = codec.encode(&img, EncoderId::WebP, Quality::MAX).unwrap();

        assert_eq!((out.width, out.height), (50, 25));
        assert_eq!(out.encoder, EncoderId::WebP);
        assert_eq!(out.size(), out.data.len() as u64);
    }
}
