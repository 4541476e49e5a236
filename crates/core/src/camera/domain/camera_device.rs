use crate::camera::domain::facing_mode::FacingMode;
use crate::camera::domain::media_stream::MediaStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    VideoInput,
}

/// A camera the platform can open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub device_id: String,
    pub label: String,
    pub kind: DeviceKind,
    pub facing: Option<FacingMode>,
}

/// Platform camera access: device listing and stream acquisition.
pub trait CameraDevice: Send {
    /// Lists video input devices.
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, Box<dyn std::error::Error>>;

    /// Acquires a video-only stream constrained by `facing`.
    fn open(&mut self, facing: FacingMode)
        -> Result<Box<dyn MediaStream>, Box<dyn std::error::Error>>;
}
