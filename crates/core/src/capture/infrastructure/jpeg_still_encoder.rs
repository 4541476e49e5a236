use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::capture::domain::still_encoder::StillEncoder;
use crate::shared::constants::{DEFAULT_JPEG_QUALITY, STILL_MIME_TYPE};
use crate::shared::frame::Frame;

/// Encodes RGB frames to baseline JPEG using the `image` crate.
pub struct JpegStillEncoder {
    quality: u8,
}

impl JpegStillEncoder {
    /// `quality` is clamped to 1..=100.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegStillEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl StillEncoder for JpegStillEncoder {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("expected an RGB frame, got {} channels", frame.channels()).into());
        }
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, self.quality).encode(
            frame.data(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(buf)
    }

    fn mime_type(&self) -> &'static str {
        STILL_MIME_TYPE
    }
}
