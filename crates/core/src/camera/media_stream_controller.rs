use std::fmt;

use crate::camera::domain::camera_device::{CameraDevice, DeviceInfo};
use crate::camera::domain::facing_mode::FacingMode;
use crate::camera::video_element::VideoElement;
use crate::shared::error::ClientError;

/// Identifies one start→stop lifetime of the camera.
///
/// Results produced under one session are never shown under another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraSessionId(u64);

#[cfg(test)]
impl CameraSessionId {
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CameraSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only view of the camera session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraSession {
    pub active: bool,
    pub facing_mode: FacingMode,
    pub id: Option<CameraSessionId>,
}

/// Sole owner of the camera stream.
///
/// At most one hardware stream is live at any time: every acquisition is
/// preceded by a full release of the previous stream.
pub struct MediaStreamController {
    device: Box<dyn CameraDevice>,
    video: VideoElement,
    facing_mode: FacingMode,
    session: Option<CameraSessionId>,
    sessions_started: u64,
}

impl MediaStreamController {
    pub fn new(device: Box<dyn CameraDevice>, video: VideoElement) -> Self {
        Self {
            device,
            video,
            facing_mode: FacingMode::default(),
            session: None,
            sessions_started: 0,
        }
    }

    /// Starts a new session facing `facing`, releasing any live stream first.
    ///
    /// On failure the controller is left inactive.
    pub fn start(&mut self, facing: FacingMode) -> Result<CameraSessionId, ClientError> {
        self.release();
        self.facing_mode = facing;

        let stream = self.device.open(facing).map_err(|e| {
            log::warn!("Camera ({}) failed to start: {e}", facing.constraint());
            ClientError::Camera(e.to_string())
        })?;
        let label = stream.label().to_string();
        self.video.attach(stream);

        self.sessions_started += 1;
        let id = CameraSessionId(self.sessions_started);
        self.session = Some(id);
        log::info!("Camera session {id} started on {label} ({facing})");
        Ok(id)
    }

    /// Stops every track and detaches the video source. No-op when inactive.
    ///
    /// Returns whether a session was active.
    pub fn stop(&mut self) -> bool {
        let was_active = self.session.is_some();
        self.release();
        if was_active {
            log::info!("Camera stopped");
        }
        was_active
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.video.detach() {
            log::debug!("Releasing stream {}", stream.label());
            stream.stop();
        }
        self.session = None;
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_id(&self) -> Option<CameraSessionId> {
        self.session
    }

    pub fn session(&self) -> CameraSession {
        CameraSession {
            active: self.is_active(),
            facing_mode: self.facing_mode,
            id: self.session,
        }
    }

    pub fn facing_mode(&self) -> FacingMode {
        self.facing_mode
    }

    pub fn video(&self) -> &VideoElement {
        &self.video
    }

    pub fn video_mut(&mut self) -> &mut VideoElement {
        &mut self.video
    }

    pub fn devices(&self) -> Result<Vec<DeviceInfo>, ClientError> {
        self.device
            .enumerate()
            .map_err(|e| ClientError::Camera(e.to_string()))
    }
}

impl Drop for MediaStreamController {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::geometry::{DisplaySize, NativeSize};
    use crate::test_support::{EventLog, StubCameraDevice};
    use rstest::rstest;

    fn controller(device: StubCameraDevice) -> MediaStreamController {
        MediaStreamController::new(
            Box::new(device),
            VideoElement::new(DisplaySize::new(320.0, 240.0)),
        )
    }

    #[rstest]
    #[case(FacingMode::Front)]
    #[case(FacingMode::Back)]
    fn test_start_attaches_stream(#[case] facing: FacingMode) {
        let log = EventLog::default();
        let mut ctrl = controller(StubCameraDevice::new(NativeSize::new(640, 480), log.clone()));

        let id = ctrl.start(facing).unwrap();

        assert!(ctrl.is_active());
        assert_eq!(ctrl.session_id(), Some(id));
        assert_eq!(ctrl.facing_mode(), facing);
        assert!(ctrl.video().has_source());
        assert_eq!(ctrl.video().native_size(), NativeSize::new(640, 480));
        assert_eq!(log.events(), vec![format!("open:1:{}", facing.constraint())]);
    }

    #[rstest]
    #[case(FacingMode::Front)]
    #[case(FacingMode::Back)]
    fn test_start_twice_releases_first_stream_before_acquiring(#[case] facing: FacingMode) {
        let log = EventLog::default();
        let mut ctrl = controller(StubCameraDevice::new(NativeSize::new(640, 480), log.clone()));

        let first = ctrl.start(facing).unwrap();
        let second = ctrl.start(facing).unwrap();

        assert_ne!(first, second);
        let constraint = facing.constraint();
        assert_eq!(
            log.events(),
            vec![
                format!("open:1:{constraint}"),
                "stop:1".to_string(),
                format!("open:2:{constraint}"),
            ]
        );
        assert_eq!(log.live_streams(), 1);
    }

    #[test]
    fn test_failed_start_stays_inactive_and_carries_message() {
        let log = EventLog::default();
        let device = StubCameraDevice::new(NativeSize::new(640, 480), log.clone());
        device.fail_switch().set(Some("Permission denied".to_string()));
        let mut ctrl = controller(device);

        let err = ctrl.start(FacingMode::Front).unwrap_err();

        assert_eq!(err, ClientError::Camera("Permission denied".to_string()));
        assert!(!ctrl.is_active());
        assert!(!ctrl.video().has_source());
    }

    #[test]
    fn test_failed_restart_still_releases_previous_stream() {
        let log = EventLog::default();
        let device = StubCameraDevice::new(NativeSize::new(640, 480), log.clone());
        let fail = device.fail_switch();
        let mut ctrl = controller(device);

        ctrl.start(FacingMode::Front).unwrap();
        fail.set(Some("device busy".to_string()));
        assert!(ctrl.start(FacingMode::Back).is_err());

        assert!(!ctrl.is_active());
        assert_eq!(log.live_streams(), 0);
    }

    #[test]
    fn test_stop_releases_tracks_and_detaches() {
        let log = EventLog::default();
        let mut ctrl = controller(StubCameraDevice::new(NativeSize::new(640, 480), log.clone()));
        ctrl.start(FacingMode::Front).unwrap();

        assert!(ctrl.stop());

        assert!(!ctrl.is_active());
        assert!(!ctrl.video().has_source());
        assert_eq!(log.events().last().unwrap(), "stop:1");
        assert_eq!(log.live_streams(), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let log = EventLog::default();
        let mut ctrl = controller(StubCameraDevice::new(NativeSize::new(640, 480), log.clone()));
        assert!(!ctrl.stop());
        ctrl.start(FacingMode::Front).unwrap();
        assert!(ctrl.stop());
        assert!(!ctrl.stop());
        assert_eq!(
            log.events().iter().filter(|e| e.starts_with("stop")).count(),
            1
        );
    }

    #[test]
    fn test_facing_change_goes_through_stop_then_start() {
        let log = EventLog::default();
        let mut ctrl = controller(StubCameraDevice::new(NativeSize::new(640, 480), log.clone()));
        ctrl.start(FacingMode::Front).unwrap();
        ctrl.stop();
        ctrl.start(FacingMode::Back).unwrap();

        assert_eq!(ctrl.session().facing_mode, FacingMode::Back);
        assert_eq!(
            log.events(),
            vec!["open:1:user", "stop:1", "open:2:environment"]
        );
    }

    #[test]
    fn test_drop_releases_stream() {
        let log = EventLog::default();
        {
            let mut ctrl =
                controller(StubCameraDevice::new(NativeSize::new(640, 480), log.clone()));
            ctrl.start(FacingMode::Front).unwrap();
        }
        assert_eq!(log.live_streams(), 0);
    }

    #[test]
    fn test_devices_lists_video_inputs() {
        let log = EventLog::default();
        let ctrl = controller(StubCameraDevice::new(NativeSize::new(640, 480), log));
        let devices = ctrl.devices().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].facing, Some(FacingMode::Front));
    }
}
