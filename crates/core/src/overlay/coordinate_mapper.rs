use crate::shared::error::ClientError;
use crate::shared::face_location::{FaceLocationRect, OverlayRect};
use crate::shared::geometry::{DisplaySize, NativeSize};

/// Maps a face rectangle from native frame pixels into display space.
///
/// Each axis is scaled independently by `display / native`. Fails with
/// [`ClientError::InvalidGeometry`] while the native size is still unknown.
pub fn map_to_display(
    rect: &FaceLocationRect,
    native: NativeSize,
    display: DisplaySize,
) -> Result<OverlayRect, ClientError> {
    if native.is_empty() {
        return Err(ClientError::InvalidGeometry {
            width: native.width,
            height: native.height,
        });
    }

    let scale_x = display.width / native.width as f64;
    let scale_y = display.height / native.height as f64;

    Ok(OverlayRect {
        top: rect.top as f64 * scale_y,
        left: rect.left as f64 * scale_x,
        width: rect.width as f64 * scale_x,
        height: rect.height as f64 * scale_y,
    })
}
