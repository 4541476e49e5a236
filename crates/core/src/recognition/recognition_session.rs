use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};

use crate::camera::media_stream_controller::CameraSessionId;
use crate::capture::captured_still::CapturedStill;
use crate::overlay::coordinate_mapper::map_to_display;
use crate::recognition::domain::recognition_outcome::{RecognitionOutcome, RegisterReply};
use crate::recognition::domain::recognition_service::RecognitionService;
use crate::recognition::domain::request_dispatcher::RequestDispatcher;
use crate::shared::constants::{
    CAMERA_NOT_ACTIVE_TEXT, CAMERA_START_FAILED_PREFIX, GEOMETRY_ERROR_PREFIX,
    NAME_REQUIRED_TEXT, RECOGNIZE_DONE_TEXT, RECOGNIZE_ERROR_PREFIX, RECOGNIZE_FAILED_TEXT,
    REGISTER_ERROR_PREFIX, REGISTER_FAILED_TEXT, STATUS_MESSAGE_TTL,
};
use crate::shared::error::ClientError;
use crate::shared::face_location::OverlayRect;
use crate::shared::geometry::{DisplaySize, NativeSize};
use crate::shared::status_message::{StatusBoard, StatusMessage};

/// Identifies one dispatched request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// The user action an error message is reported against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    StartCamera,
    Register,
    Recognize,
}

/// A finished request, posted from whichever thread ran it.
enum SessionEvent {
    Registered {
        ticket: RequestTicket,
        result: Result<RegisterReply, ClientError>,
    },
    Recognized {
        ticket: RequestTicket,
        camera_session: CameraSessionId,
        source: NativeSize,
        result: Result<RecognitionOutcome, ClientError>,
    },
}

/// What [`RecognitionSession::pump`] applied, for the caller's own
/// bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionUpdate {
    RegistrationFinished { ticket: RequestTicket, succeeded: bool },
    /// `applied` is false when the camera session changed while the
    /// request was in flight.
    RecognitionFinished { ticket: RequestTicket, applied: bool },
}

/// The camera state results are applied against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionView {
    pub active_camera: Option<CameraSessionId>,
    pub display: DisplaySize,
}

/// Runs register/recognize requests and owns what they produce: the
/// latest outcome, its overlay, and the status message.
///
/// Requests run on the dispatcher; their results come back over a channel
/// and are applied by [`RecognitionSession::pump`] in arrival order, so
/// the last response to arrive wins.
pub struct RecognitionSession {
    service: Arc<dyn RecognitionService>,
    dispatcher: Box<dyn RequestDispatcher>,
    tx: Sender<SessionEvent>,
    rx: Receiver<SessionEvent>,
    next_ticket: u64,
    outcome: Option<RecognitionOutcome>,
    overlay: Option<OverlayRect>,
    status: StatusBoard,
    pending_registrations: usize,
    /// In-flight recognize requests and the camera session each was taken under.
    pending_recognitions: HashMap<RequestTicket, CameraSessionId>,
}

impl RecognitionSession {
    pub fn new(
        service: Arc<dyn RecognitionService>,
        dispatcher: Box<dyn RequestDispatcher>,
    ) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            service,
            dispatcher,
            tx,
            rx,
            next_ticket: 0,
            outcome: None,
            overlay: None,
            status: StatusBoard::new(STATUS_MESSAGE_TTL),
            pending_registrations: 0,
            pending_recognitions: HashMap::new(),
        }
    }

    /// Trims `name`; empty after trimming is a validation error.
    pub fn validate_name(name: &str) -> Result<&str, ClientError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ClientError::Validation(NAME_REQUIRED_TEXT.to_string()));
        }
        Ok(trimmed)
    }

    /// Validates and dispatches a register request.
    ///
    /// Validation failures post their message here and contact nothing.
    pub fn register(
        &mut self,
        name: &str,
        still: CapturedStill,
        now: Instant,
    ) -> Result<RequestTicket, ClientError> {
        let checked = Self::validate_name(name).and_then(|name| {
            if still.is_valid() {
                Ok(name.to_string())
            } else {
                Err(ClientError::NoFrameAvailable)
            }
        });
        let name = match checked {
            Ok(name) => name,
            Err(err) => {
                self.post_error(Action::Register, &err, now);
                return Err(err);
            }
        };

        let ticket = self.issue_ticket();
        self.pending_registrations += 1;
        log::info!("Dispatching register {ticket} for '{name}'");

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        self.dispatcher.dispatch(Box::new(move || {
            let result = service.register(&name, &still);
            let _ = tx.send(SessionEvent::Registered { ticket, result });
        }));
        Ok(ticket)
    }

    /// Dispatches a recognize request for a still taken under
    /// `camera_session`.
    pub fn recognize(
        &mut self,
        still: CapturedStill,
        camera_session: CameraSessionId,
        now: Instant,
    ) -> Result<RequestTicket, ClientError> {
        if !still.is_valid() {
            let err = ClientError::NoFrameAvailable;
            self.post_error(Action::Recognize, &err, now);
            return Err(err);
        }

        let ticket = self.issue_ticket();
        self.pending_recognitions.insert(ticket, camera_session);
        let source = still.source_size();
        log::info!("Dispatching recognize {ticket} ({source} still, camera {camera_session})");

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        self.dispatcher.dispatch(Box::new(move || {
            let result = service.recognize(&still);
            let _ = tx.send(SessionEvent::Recognized {
                ticket,
                camera_session,
                source,
                result,
            });
        }));
        Ok(ticket)
    }

    /// Posts the one error message for a failed `action`.
    pub fn post_error(&mut self, action: Action, err: &ClientError, now: Instant) {
        log::warn!("{action:?} failed: {err}");
        self.status
            .post(StatusMessage::error(error_text(action, err), now));
    }

    pub fn post_success(&mut self, text: impl Into<String>, now: Instant) {
        self.status.post(StatusMessage::success(text, now));
    }

    /// Applies every finished request, in arrival order, and drops expired
    /// messages.
    pub fn pump(&mut self, view: SessionView, now: Instant) -> Vec<SessionUpdate> {
        let events: Vec<SessionEvent> = self.rx.try_iter().collect();
        let updates = events
            .into_iter()
            .map(|event| self.apply(event, view, now))
            .collect();
        self.status.clear_expired(now);
        updates
    }

    fn apply(&mut self, event: SessionEvent, view: SessionView, now: Instant) -> SessionUpdate {
        match event {
            SessionEvent::Registered { ticket, result } => {
                self.pending_registrations = self.pending_registrations.saturating_sub(1);
                let succeeded = result.is_ok();
                match result {
                    Ok(reply) => {
                        log::info!("Register {ticket} succeeded");
                        self.post_success(reply.message, now);
                    }
                    Err(err) => self.post_error(Action::Register, &err, now),
                }
                SessionUpdate::RegistrationFinished { ticket, succeeded }
            }
            SessionEvent::Recognized {
                ticket,
                camera_session,
                source,
                result,
            } => {
                self.pending_recognitions.remove(&ticket);
                let current = view.active_camera == Some(camera_session);
                let outcome = match result {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        self.post_error(Action::Recognize, &err, now);
                        return SessionUpdate::RecognitionFinished {
                            ticket,
                            applied: false,
                        };
                    }
                };

                if !current {
                    log::warn!(
                        "Dropping recognize {ticket}: camera session {camera_session} is no longer active"
                    );
                    self.post_success(RECOGNIZE_DONE_TEXT, now);
                    return SessionUpdate::RecognitionFinished {
                        ticket,
                        applied: false,
                    };
                }

                let mapped = match (&outcome.face_location, outcome.face_detected) {
                    (Some(location), true) => Some(map_to_display(location, source, view.display)),
                    _ => None,
                };
                log::debug!(
                    "Recognize {ticket}: face_detected={} recognized={}",
                    outcome.face_detected,
                    outcome.recognized
                );
                self.outcome = Some(outcome);
                match mapped {
                    Some(Ok(rect)) => {
                        self.overlay = Some(rect);
                        self.post_success(RECOGNIZE_DONE_TEXT, now);
                    }
                    Some(Err(err)) => {
                        self.overlay = None;
                        self.post_error(Action::Recognize, &err, now);
                    }
                    None => {
                        self.overlay = None;
                        self.post_success(RECOGNIZE_DONE_TEXT, now);
                    }
                }
                SessionUpdate::RecognitionFinished {
                    ticket,
                    applied: true,
                }
            }
        }
    }

    /// Forgets the outcome and overlay. In-flight requests still report.
    pub fn clear_results(&mut self) {
        self.outcome = None;
        self.overlay = None;
    }

    pub fn outcome(&self) -> Option<&RecognitionOutcome> {
        self.outcome.as_ref()
    }

    pub fn overlay(&self) -> Option<&OverlayRect> {
        self.overlay.as_ref()
    }

    pub fn status(&self, now: Instant) -> Option<&StatusMessage> {
        self.status.current(now)
    }

    pub fn messages_posted(&self) -> u64 {
        self.status.posted()
    }

    /// Messages posted since the last call, oldest first.
    pub fn take_unread_messages(&mut self) -> Vec<StatusMessage> {
        self.status.take_unread()
    }

    pub fn expire_messages(&mut self, now: Instant) {
        self.status.clear_expired(now);
    }

    pub fn has_pending(&self) -> bool {
        self.pending_registrations > 0 || !self.pending_recognitions.is_empty()
    }

    pub fn pending_recognitions(&self) -> usize {
        self.pending_recognitions.len()
    }

    /// In-flight recognize requests whose still was taken under `camera`.
    pub fn pending_recognitions_for(&self, camera: CameraSessionId) -> usize {
        self.pending_recognitions
            .values()
            .filter(|&&session| session == camera)
            .count()
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        self.next_ticket += 1;
        RequestTicket(self.next_ticket)
    }
}

/// User-facing text for a failed `action`.
pub fn error_text(action: Action, err: &ClientError) -> String {
    let (fallback, prefix) = match action {
        Action::StartCamera => (CAMERA_START_FAILED_PREFIX, CAMERA_START_FAILED_PREFIX),
        Action::Register => (REGISTER_FAILED_TEXT, REGISTER_ERROR_PREFIX),
        Action::Recognize => (RECOGNIZE_FAILED_TEXT, RECOGNIZE_ERROR_PREFIX),
    };
    match err {
        ClientError::Validation(text) => text.clone(),
        ClientError::NoFrameAvailable => CAMERA_NOT_ACTIVE_TEXT.to_string(),
        ClientError::Camera(reason) => format!("{CAMERA_START_FAILED_PREFIX}: {reason}"),
        ClientError::InvalidGeometry { .. } => format!("{GEOMETRY_ERROR_PREFIX}: {err}"),
        ClientError::Service { detail, .. } => {
            detail.clone().unwrap_or_else(|| fallback.to_string())
        }
        ClientError::Network(description) => format!("{prefix}: {description}"),
        ClientError::Encode(_) => format!("{prefix}: {err}"),
    }
}
