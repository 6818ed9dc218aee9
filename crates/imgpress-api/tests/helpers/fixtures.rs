//! Image fixtures built in memory.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imgpress_core::{EncoderId, Quality};
use imgpress_processing::{ImageCodec, StandardCodec};

/// A noisy gradient, so lossy encoders have something to compress.
pub fn test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        let noise = ((x * 7919 + y * 104_729) % 31) as u8;
        Rgba([
            (x % 256) as u8 ^ noise,
            (y % 256) as u8,
            ((x + y) % 256) as u8,
            255,
        ])
    }))
}

fn encode_with_image_crate(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture");
    buffer
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    encode_with_image_crate(&test_image(width, height), ImageFormat::Png)
}

pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let rgb = DynamicImage::ImageRgb8(test_image(width, height).to_rgb8());
    encode_with_image_crate(&rgb, ImageFormat::Jpeg)
}

pub fn create_test_webp(width: u32, height: u32) -> Vec<u8> {
    encode_with_image_crate(&test_image(width, height), ImageFormat::WebP)
}

pub fn create_test_jxl(width: u32, height: u32) -> Vec<u8> {
    StandardCodec
        .encode(&test_image(width, height), EncoderId::JxlLossless, Quality::MAX)
        .expect("Failed to encode jxl fixture")
        .data
        .to_vec()
}

pub fn create_test_gif(width: u32, height: u32) -> Vec<u8> {
    encode_with_image_crate(&test_image(width, height), ImageFormat::Gif)
}
