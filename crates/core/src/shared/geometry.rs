use std::fmt;
use std::str::FromStr;

/// Pixel dimensions of the camera's captured frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NativeSize {
    pub width: u32,
    pub height: u32,
}

impl NativeSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True until the stream has produced frames.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for NativeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rendered size of the video surface, independent of the native
/// resolution (layout may scale the video).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for DisplaySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for DisplaySize {
    type Err = String;

    /// Parses `WIDTHxHEIGHT`, e.g. `640x480`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width: f64 = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid display width '{w}'"))?;
        let height: f64 = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid display height '{h}'"))?;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(format!("display size must be positive, got '{s}'"));
        }
        Ok(Self { width, height })
    }
}

/// Both coordinate spaces of the video surface at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameGeometry {
    pub native: NativeSize,
    pub display: DisplaySize,
}
