use std::path::Path;

use image::{Rgb, RgbImage};

use crate::shared::constants::{OVERLAY_COLOR, OVERLAY_LINE_WIDTH};
use crate::shared::face_location::OverlayRect;
use crate::shared::frame::Frame;
use crate::shared::geometry::DisplaySize;

/// Composites the face overlay onto a frame at display size.
///
/// The frame is scaled to the display size first, then the rectangle is
/// stroked centred on its edges, the way a 2D canvas `strokeRect` draws.
pub struct OverlayRenderer {
    color: [u8; 3],
    line_width: u32,
}

impl OverlayRenderer {
    pub fn new(color: [u8; 3], line_width: u32) -> Self {
        Self {
            color,
            line_width: line_width.max(1),
        }
    }

    pub fn render(
        &self,
        frame: &Frame,
        display: DisplaySize,
        overlay: Option<&OverlayRect>,
    ) -> Result<RgbImage, Box<dyn std::error::Error>> {
        let img = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;

        let (w, h) = display_pixels(display);
        let mut img = if (w, h) == img.dimensions() {
            img
        } else {
            image::imageops::resize(&img, w, h, image::imageops::FilterType::Triangle)
        };

        if let Some(rect) = overlay {
            self.stroke(&mut img, rect);
        }
        Ok(img)
    }

    /// Renders and writes to `path`; the format follows the extension.
    pub fn render_to_file(
        &self,
        path: &Path,
        frame: &Frame,
        display: DisplaySize,
        overlay: Option<&OverlayRect>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.render(frame, display, overlay)?.save(path)?;
        Ok(())
    }

    fn stroke(&self, img: &mut RgbImage, rect: &OverlayRect) {
        let half = self.line_width as f64 / 2.0;
        let left = rect.left.round() as i64;
        let top = rect.top.round() as i64;
        let right = rect.right().round() as i64;
        let bottom = rect.bottom().round() as i64;
        let inner = half.floor() as i64;
        let outer = self.line_width as i64 - inner;

        // horizontal edges
        for y in [top, bottom] {
            self.fill(img, left - inner, y - inner, right + outer, y + outer);
        }
        // vertical edges
        for x in [left, right] {
            self.fill(img, x - inner, top - inner, x + outer, bottom + outer);
        }
    }

    /// Fills the half-open box `[x0, x1) x [y0, y1)`, clipped to the image.
    fn fill(&self, img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64) {
        let (w, h) = (img.width() as i64, img.height() as i64);
        let (x0, x1) = (x0.clamp(0, w), x1.clamp(0, w));
        let (y0, y1) = (y0.clamp(0, h), y1.clamp(0, h));
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x as u32, y as u32, Rgb(self.color));
            }
        }
    }
}

impl Default for OverlayRenderer {
    fn default() -> Self {
        Self::new(OVERLAY_COLOR, OVERLAY_LINE_WIDTH)
    }
}

fn display_pixels(display: DisplaySize) -> (u32, u32) {
    (
        display.width.round().max(1.0) as u32,
        display.height.round().max(1.0) as u32,
    )
}
