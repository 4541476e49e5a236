use crate::shared::frame::Frame;

/// Compresses a frame into a still image, keeping its dimensions.
pub trait StillEncoder: Send {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    fn mime_type(&self) -> &'static str;
}
