//! Source ingestion: bytes in, decoded pixels out.
//!
//! The container is sniffed from the data rather than trusted from the filename.
//! JPEG XL goes through `jxl-oxide`; everything else through the `image` crate.

use std::io::Cursor;

use image::{DynamicImage, ImageReader};
use jxl_oxide::integration::JxlDecoder;

use crate::codec::CodecError;

const JXL_CODESTREAM_SIGNATURE: &[u8] = &[0xFF, 0x0A];
const JXL_CONTAINER_SIGNATURE: &[u8] = &[
    0x00, 0x00, 0x00, 0x0C, 0x4A, 0x58, 0x4C, 0x20, 0x0D, 0x0A, 0x87, 0x0A,
];

/// True when `data` starts with a JPEG XL codestream or container signature.
pub fn is_jxl(data: &[u8]) -> bool {
    data.starts_with(JXL_CODESTREAM_SIGNATURE) || data.starts_with(JXL_CONTAINER_SIGNATURE)
}

pub fn decode_image(data: &[u8]) -> Result<DynamicImage, CodecError> {
    if data.is_empty() {
        return Err(CodecError::Decode("empty input".to_string()));
    }

    if is_jxl(data) {
        let decoder = JxlDecoder::new(Cursor::new(data))
            .map_err(|e| CodecError::Decode(format!("jxl: {}", e)))?;
        return DynamicImage::from_decoder(decoder)
            .map_err(|e| CodecError::Decode(format!("jxl: {}", e)));
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    if reader.format().is_none() {
        return Err(CodecError::Decode("unrecognized image data".to_string()));
    }

    reader
        .decode()
        .map_err(|e| CodecError::Decode(e.to_string()))
}
