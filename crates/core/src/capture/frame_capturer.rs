use crate::camera::video_element::VideoElement;
use crate::capture::captured_still::CapturedStill;
use crate::capture::domain::still_encoder::StillEncoder;
use crate::shared::error::ClientError;

/// Snapshots the live video into a compressed still.
///
/// Always captures at native resolution so a face location returned by the
/// service is expressed in the same pixel space as the still.
pub struct FrameCapturer {
    encoder: Box<dyn StillEncoder>,
}

impl FrameCapturer {
    pub fn new(encoder: Box<dyn StillEncoder>) -> Self {
        Self { encoder }
    }

    pub fn capture_still(&self, video: &mut VideoElement) -> Result<CapturedStill, ClientError> {
        if !video.has_source() || video.native_size().is_empty() {
            return Err(ClientError::NoFrameAvailable);
        }

        let frame = video.current_frame()?;
        if frame.size().is_empty() {
            return Err(ClientError::NoFrameAvailable);
        }

        let encoded = self
            .encoder
            .encode(&frame)
            .map_err(|e| ClientError::Encode(e.to_string()))?;
        log::debug!(
            "Captured {} still ({} bytes) at {}",
            self.encoder.mime_type(),
            encoded.len(),
            frame.size()
        );
        Ok(CapturedStill::new(encoded, frame.width(), frame.height()))
    }

    pub fn mime_type(&self) -> &'static str {
        self.encoder.mime_type()
    }
}
