use crate::camera::domain::media_stream::MediaStream;
use crate::shared::error::ClientError;
use crate::shared::frame::Frame;
use crate::shared::geometry::{DisplaySize, FrameGeometry, NativeSize};

/// The live video surface: an optional attached stream plus the size the
/// surface is laid out at.
///
/// Native size comes from the attached stream; display size is whatever
/// the presentation layer sets.
pub struct VideoElement {
    source: Option<Box<dyn MediaStream>>,
    display: DisplaySize,
}

impl VideoElement {
    pub fn new(display: DisplaySize) -> Self {
        Self {
            source: None,
            display,
        }
    }

    /// Attaches `stream`, returning the previously attached one (if any)
    /// without stopping it.
    pub fn attach(&mut self, stream: Box<dyn MediaStream>) -> Option<Box<dyn MediaStream>> {
        self.source.replace(stream)
    }

    pub fn detach(&mut self) -> Option<Box<dyn MediaStream>> {
        self.source.take()
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn source_label(&self) -> Option<&str> {
        self.source.as_deref().map(|s| s.label())
    }

    /// Native frame size, or `0x0` when nothing is attached.
    pub fn native_size(&self) -> NativeSize {
        self.source
            .as_deref()
            .map(|s| s.native_size())
            .unwrap_or_default()
    }

    pub fn display_size(&self) -> DisplaySize {
        self.display
    }

    pub fn set_display_size(&mut self, display: DisplaySize) {
        self.display = display;
    }

    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry {
            native: self.native_size(),
            display: self.display,
        }
    }

    /// Reads the attached stream's current frame.
    pub fn current_frame(&mut self) -> Result<Frame, ClientError> {
        let source = self.source.as_mut().ok_or(ClientError::NoFrameAvailable)?;
        source.read_frame().map_err(|e| {
            log::warn!("Failed to read frame from {}: {e}", source.label());
            ClientError::NoFrameAvailable
        })
    }
}
