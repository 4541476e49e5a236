use std::time::Instant;

use crate::camera::domain::camera_device::DeviceInfo;
use crate::camera::domain::facing_mode::FacingMode;
use crate::camera::media_stream_controller::{CameraSession, CameraSessionId, MediaStreamController};
use crate::capture::captured_still::CapturedStill;
use crate::capture::frame_capturer::FrameCapturer;
use crate::recognition::domain::recognition_outcome::RecognitionOutcome;
use crate::recognition::recognition_session::{
    Action, RecognitionSession, RequestTicket, SessionUpdate, SessionView,
};
use crate::shared::constants::{REGISTER_NOT_OPEN_TEXT, REGISTRATION_OPEN_TEXT};
use crate::shared::error::ClientError;
use crate::shared::face_location::OverlayRect;
use crate::shared::frame::Frame;
use crate::shared::geometry::DisplaySize;
use crate::shared::status_message::StatusMessage;

/// Where the machine is, as a user would describe it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    CameraOff,
    Idle,
    Registering,
    /// Idle with at least one recognize request in flight.
    AwaitingRecognitionResult,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Mode {
    Idle,
    Registering {
        name: String,
        submitted: Option<RequestTicket>,
    },
}

/// Everything a presentation layer needs to draw one frame of UI.
#[derive(Clone, Debug, PartialEq)]
pub struct UiSnapshot {
    pub phase: Phase,
    pub facing_mode: FacingMode,
    pub facing_selector_enabled: bool,
    pub status: Option<StatusMessage>,
    pub outcome: Option<RecognitionOutcome>,
    pub overlay: Option<OverlayRect>,
    pub register_name: Option<String>,
}

/// What one [`UiStateMachine::pump`] produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PumpReport {
    pub updates: Vec<SessionUpdate>,
    /// Every message posted since the previous pump, oldest first,
    /// including ones already superseded on the status line.
    pub messages: Vec<StatusMessage>,
}

impl PumpReport {
    /// Whether a recognition result was applied to the current camera.
    pub fn recognition_applied(&self) -> bool {
        self.updates
            .iter()
            .any(|u| matches!(u, SessionUpdate::RecognitionFinished { applied: true, .. }))
    }
}

/// Top-level controller: camera on/off, registration mode, and result
/// display over one shared camera stream.
///
/// Every user action that fails ends in exactly one error message; every
/// request that finishes ends in exactly one message of its own.
pub struct UiStateMachine {
    camera: MediaStreamController,
    capturer: FrameCapturer,
    session: RecognitionSession,
    mode: Mode,
    selected_facing: FacingMode,
}

impl UiStateMachine {
    pub fn new(
        camera: MediaStreamController,
        capturer: FrameCapturer,
        session: RecognitionSession,
    ) -> Self {
        let selected_facing = camera.facing_mode();
        Self {
            camera,
            capturer,
            session,
            mode: Mode::Idle,
            selected_facing,
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.camera.is_active() {
            return Phase::CameraOff;
        }
        // Requests from an earlier camera session never hold the new one.
        let awaiting = self
            .camera
            .session_id()
            .is_some_and(|id| self.session.pending_recognitions_for(id) > 0);
        match self.mode {
            Mode::Registering { .. } => Phase::Registering,
            Mode::Idle if awaiting => Phase::AwaitingRecognitionResult,
            Mode::Idle => Phase::Idle,
        }
    }

    /// Selects the facing mode for the next start. Rejected while the
    /// camera is running.
    pub fn select_facing_mode(&mut self, facing: FacingMode) -> bool {
        if self.camera.is_active() {
            log::debug!("Facing mode change to {facing} ignored: camera is active");
            return false;
        }
        self.selected_facing = facing;
        true
    }

    pub fn start_camera(&mut self, now: Instant) -> Result<CameraSessionId, ClientError> {
        self.session.clear_results();
        self.mode = Mode::Idle;
        self.camera.start(self.selected_facing).map_err(|err| {
            self.session.post_error(Action::StartCamera, &err, now);
            err
        })
    }

    /// Stops the camera and clears outcome and overlay. Returns whether
    /// the camera was running.
    pub fn stop_camera(&mut self) -> bool {
        let was_active = self.camera.stop();
        self.session.clear_results();
        self.mode = Mode::Idle;
        was_active
    }

    pub fn begin_register(&mut self, now: Instant) -> Result<(), ClientError> {
        self.require_camera(Action::Register, now)?;
        if matches!(self.mode, Mode::Idle) {
            log::debug!("Entering registration");
            self.mode = Mode::Registering {
                name: String::new(),
                submitted: None,
            };
        }
        Ok(())
    }

    /// Updates the entered name. Ignored outside registration.
    pub fn set_register_name(&mut self, value: &str) -> bool {
        match &mut self.mode {
            Mode::Registering { name, .. } => {
                *name = value.to_string();
                true
            }
            Mode::Idle => false,
        }
    }

    /// Leaves registration, discarding the entered name.
    pub fn cancel_register(&mut self) -> bool {
        let was_registering = matches!(self.mode, Mode::Registering { .. });
        self.mode = Mode::Idle;
        was_registering
    }

    /// Submits the entered name with a fresh still.
    ///
    /// A name or capture failure keeps the form open; once dispatched, the
    /// response returns the machine to idle whatever it says.
    pub fn submit_register(&mut self, now: Instant) -> Result<RequestTicket, ClientError> {
        let name = match &self.mode {
            Mode::Registering { name, .. } => name.clone(),
            Mode::Idle => {
                let err = ClientError::Validation(REGISTER_NOT_OPEN_TEXT.to_string());
                self.session.post_error(Action::Register, &err, now);
                return Err(err);
            }
        };
        if let Err(err) = RecognitionSession::validate_name(&name) {
            self.session.post_error(Action::Register, &err, now);
            return Err(err);
        }
        self.require_camera(Action::Register, now)?;

        let still = self.capture(Action::Register, now)?;
        let ticket = self.session.register(&name, still, now)?;
        if let Mode::Registering { submitted, .. } = &mut self.mode {
            *submitted = Some(ticket);
        }
        Ok(ticket)
    }

    /// Recognizes the current frame. Only offered while idle; the open
    /// registration form must be submitted or cancelled first.
    pub fn recognize(&mut self, now: Instant) -> Result<RequestTicket, ClientError> {
        let camera_session = self.require_camera(Action::Recognize, now)?;
        if matches!(self.mode, Mode::Registering { .. }) {
            let err = ClientError::Validation(REGISTRATION_OPEN_TEXT.to_string());
            self.session.post_error(Action::Recognize, &err, now);
            return Err(err);
        }
        let still = self.capture(Action::Recognize, now)?;
        self.session.recognize(still, camera_session, now)
    }

    /// Applies finished requests and expires old messages. Call regularly
    /// from the thread that owns the machine.
    pub fn pump(&mut self, now: Instant) -> PumpReport {
        let view = SessionView {
            active_camera: self.camera.session_id(),
            display: self.camera.video().display_size(),
        };
        let updates = self.session.pump(view, now);
        for update in &updates {
            if let SessionUpdate::RegistrationFinished { ticket, .. } = update {
                let awaited = matches!(
                    &self.mode,
                    Mode::Registering { submitted: Some(t), .. } if t == ticket
                );
                if awaited {
                    log::debug!("Registration {ticket} finished; leaving registration");
                    self.mode = Mode::Idle;
                }
            }
        }
        PumpReport {
            updates,
            messages: self.session.take_unread_messages(),
        }
    }

    pub fn snapshot(&self, now: Instant) -> UiSnapshot {
        UiSnapshot {
            phase: self.phase(),
            facing_mode: self.selected_facing,
            facing_selector_enabled: !self.camera.is_active(),
            status: self.session.status(now).cloned(),
            outcome: self.session.outcome().cloned(),
            overlay: self.session.overlay().copied(),
            register_name: match &self.mode {
                Mode::Registering { name, .. } => Some(name.clone()),
                Mode::Idle => None,
            },
        }
    }

    pub fn devices(&self) -> Result<Vec<DeviceInfo>, ClientError> {
        self.camera.devices()
    }

    pub fn camera_session(&self) -> CameraSession {
        self.camera.session()
    }

    pub fn display_size(&self) -> DisplaySize {
        self.camera.video().display_size()
    }

    pub fn set_display_size(&mut self, display: DisplaySize) {
        self.camera.video_mut().set_display_size(display);
    }

    /// The live frame at native resolution, for rendering.
    pub fn current_frame(&mut self) -> Result<Frame, ClientError> {
        self.camera.video_mut().current_frame()
    }

    pub fn overlay(&self) -> Option<&OverlayRect> {
        self.session.overlay()
    }

    pub fn messages_posted(&self) -> u64 {
        self.session.messages_posted()
    }

    fn require_camera(
        &mut self,
        action: Action,
        now: Instant,
    ) -> Result<CameraSessionId, ClientError> {
        self.camera.session_id().ok_or_else(|| {
            let err = ClientError::NoFrameAvailable;
            self.session.post_error(action, &err, now);
            err
        })
    }

    fn capture(&mut self, action: Action, now: Instant) -> Result<CapturedStill, ClientError> {
        self.capturer
            .capture_still(self.camera.video_mut())
            .map_err(|err| {
                self.session.post_error(action, &err, now);
                err
            })
    }
}
