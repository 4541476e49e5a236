use crate::shared::frame::Frame;
use crate::shared::geometry::NativeSize;

/// A blocking decoder that yields camera frames in capture order.
///
/// Drained continuously by a reader thread; dropping it releases the device.
pub trait FrameSource: Send + 'static {
    fn label(&self) -> &str;

    fn native_size(&self) -> NativeSize;

    /// Blocks until the next frame is decoded. `Ok(None)` ends the feed.
    fn next_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;
}
