//! Codecs that wrap the production codec to observe or slow it down.

use std::sync::Mutex;
use std::time::Duration;

use image::DynamicImage;
use imgpress_core::{EncoderId, Quality, ResizeDirective};
use imgpress_processing::{CodecError, EncodedImage, ImageCodec, StandardCodec};

/// Sleeps before decoding.
pub struct SlowCodec {
    pub delay: Duration,
}

impl ImageCodec for SlowCodec {
    fn ingest(&self, data: &[u8]) -> Result<DynamicImage, CodecError> {
        std::thread::sleep(self.delay);
        StandardCodec.ingest(data)
    }

    fn preprocess(
        &self,
        img: DynamicImage,
        resize: &ResizeDirective,
    ) -> Result<DynamicImage, CodecError> {
        StandardCodec.preprocess(img, resize)
    }

    fn encode(
        &self,
        img: &DynamicImage,
        encoder: EncoderId,
        quality: Quality,
    ) -> Result<EncodedImage, CodecError> {
        StandardCodec.encode(img, encoder, quality)
    }
}

/// Records every resize directive and encoder call it receives.
#[derive(Default)]
pub struct RecordingCodec {
    pub directives: Mutex<Vec<ResizeDirective>>,
    pub encodes: Mutex<Vec<(EncoderId, Quality)>>,
}

impl ImageCodec for RecordingCodec {
    fn ingest(&self, data: &[u8]) -> Result<DynamicImage, CodecError> {
        StandardCodec.ingest(data)
    }

    fn preprocess(
        &self,
        img: DynamicImage,
        resize: &ResizeDirective,
    ) -> Result<DynamicImage, CodecError> {
        self.directives.lock().unwrap().push(*resize);
        StandardCodec.preprocess(img, resize)
    }

    fn encode(
        &self,
        img: &DynamicImage,
        encoder: EncoderId,
        quality: Quality,
    ) -> Result<EncodedImage, CodecError> {
        self.encodes.lock().unwrap().push((encoder, quality));
        StandardCodec.encode(img, encoder, quality)
    }
}
