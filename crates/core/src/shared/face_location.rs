use serde::{Deserialize, Serialize};

/// Face bounding box as reported by the recognition service, in the native
/// pixel space of the still that was submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceLocationRect {
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceLocationRect {
    pub fn new(top: i32, left: i32, width: i32, height: i32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

/// Face bounding box in display space, ready to be drawn over the video.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl OverlayRect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

impl From<FaceLocationRect> for OverlayRect {
    fn from(rect: FaceLocationRect) -> Self {
        Self {
            top: rect.top as f64,
            left: rect.left as f64,
            width: rect.width as f64,
            height: rect.height as f64,
        }
    }
}
