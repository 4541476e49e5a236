use crate::shared::frame::Frame;
use crate::shared::geometry::NativeSize;

/// A live, video-only camera stream.
///
/// Holding one means holding the camera hardware; [`MediaStream::stop`]
/// releases every track and must be idempotent.
pub trait MediaStream: Send {
    /// Identifier of the underlying device input.
    fn label(&self) -> &str;

    /// Native frame size; empty until the stream produces frames.
    fn native_size(&self) -> NativeSize;

    /// Returns the stream's current frame at native resolution.
    fn read_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;

    /// Stops every track of the stream.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}
