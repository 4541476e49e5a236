use crate::shared::geometry::NativeSize;

/// A compressed snapshot of one live frame, at the frame's native size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedStill {
    pub encoded_image: Vec<u8>,
    pub source_width: u32,
    pub source_height: u32,
}

impl CapturedStill {
    pub fn new(encoded_image: Vec<u8>, source_width: u32, source_height: u32) -> Self {
        Self {
            encoded_image,
            source_width,
            source_height,
        }
    }

    pub fn source_size(&self) -> NativeSize {
        NativeSize::new(self.source_width, self.source_height)
    }

    /// A still worth sending: non-empty payload and known dimensions.
    pub fn is_valid(&self) -> bool {
        !self.encoded_image.is_empty() && !self.source_size().is_empty()
    }
}
