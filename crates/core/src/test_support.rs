//! Hand-written stubs for the camera, service, and dispatcher ports.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::camera::domain::camera_device::{CameraDevice, DeviceInfo, DeviceKind};
use crate::camera::domain::facing_mode::FacingMode;
use crate::camera::domain::media_stream::MediaStream;
use crate::capture::captured_still::CapturedStill;
use crate::recognition::domain::recognition_outcome::{RecognitionOutcome, RegisterReply};
use crate::recognition::domain::recognition_service::RecognitionService;
use crate::recognition::domain::request_dispatcher::{RequestDispatcher, RequestJob};
use crate::shared::error::ClientError;
use crate::shared::frame::Frame;
use crate::shared::geometry::NativeSize;

/// Shared record of stream acquisitions (`open:{id}:{constraint}`) and
/// releases (`stop:{id}`).
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Opened streams not yet stopped.
    pub fn live_streams(&self) -> usize {
        let events = self.events.lock().unwrap();
        let opened = events.iter().filter(|e| e.starts_with("open:")).count();
        let stopped = events.iter().filter(|e| e.starts_with("stop:")).count();
        opened - stopped
    }
}

pub struct StubStream {
    id: u64,
    label: String,
    size: NativeSize,
    log: EventLog,
    live: bool,
    frames_read: usize,
    pub fail_reads: bool,
}

impl StubStream {
    pub fn new(id: u64, size: NativeSize, log: EventLog) -> Self {
        Self {
            id,
            label: format!("stub-{id}"),
            size,
            log,
            live: true,
            frames_read: 0,
            fail_reads: false,
        }
    }
}

impl MediaStream for StubStream {
    fn label(&self) -> &str {
        &self.label
    }

    fn native_size(&self) -> NativeSize {
        self.size
    }

    fn read_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        if self.fail_reads || !self.live {
            return Err("stream not readable".into());
        }
        let frame = Frame::filled(self.size.width, self.size.height, [90, 120, 150], self.frames_read);
        self.frames_read += 1;
        Ok(frame)
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.log.push(format!("stop:{}", self.id));
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

/// Makes the next `open` calls fail with the given message while set.
#[derive(Clone, Default)]
pub struct FailSwitch(Arc<Mutex<Option<String>>>);

impl FailSwitch {
    pub fn set(&self, message: Option<String>) {
        *self.0.lock().unwrap() = message;
    }

    fn get(&self) -> Option<String> {
        self.0.lock().unwrap().clone()
    }
}

pub struct StubCameraDevice {
    size: NativeSize,
    log: EventLog,
    opened: u64,
    fail: FailSwitch,
}

impl StubCameraDevice {
    pub fn new(size: NativeSize, log: EventLog) -> Self {
        Self {
            size,
            log,
            opened: 0,
            fail: FailSwitch::default(),
        }
    }

    pub fn fail_switch(&self) -> FailSwitch {
        self.fail.clone()
    }
}

impl CameraDevice for StubCameraDevice {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>, Box<dyn std::error::Error>> {
        Ok(FacingMode::ALL
            .iter()
            .map(|&facing| DeviceInfo {
                device_id: format!("stub-{facing}"),
                label: format!("Stub {facing} camera"),
                kind: DeviceKind::VideoInput,
                facing: Some(facing),
            })
            .collect())
    }

    fn open(
        &mut self,
        facing: FacingMode,
    ) -> Result<Box<dyn MediaStream>, Box<dyn std::error::Error>> {
        if let Some(message) = self.fail.get() {
            return Err(message.into());
        }
        self.opened += 1;
        self.log
            .push(format!("open:{}:{}", self.opened, facing.constraint()));
        Ok(Box::new(StubStream::new(self.opened, self.size, self.log.clone())))
    }
}

/// Service stub answering from queues of canned results, recording every
/// call it receives.
#[derive(Default)]
pub struct StubService {
    register_replies: Mutex<VecDeque<Result<RegisterReply, ClientError>>>,
    recognize_replies: Mutex<VecDeque<Result<RecognitionOutcome, ClientError>>>,
    calls: Mutex<Vec<String>>,
}

impl StubService {
    pub fn with_register(self, reply: Result<RegisterReply, ClientError>) -> Self {
        self.register_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_recognize(self, reply: Result<RecognitionOutcome, ClientError>) -> Self {
        self.recognize_replies.lock().unwrap().push_back(reply);
        self
    }

    /// `register:{name}` / `recognize` in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl RecognitionService for StubService {
    fn register(&self, name: &str, _still: &CapturedStill) -> Result<RegisterReply, ClientError> {
        self.calls.lock().unwrap().push(format!("register:{name}"));
        self.register_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no canned reply".to_string())))
    }

    fn recognize(&self, _still: &CapturedStill) -> Result<RecognitionOutcome, ClientError> {
        self.calls.lock().unwrap().push("recognize".to_string());
        self.recognize_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no canned reply".to_string())))
    }
}

/// Holds dispatched jobs until the test decides which one completes.
#[derive(Clone, Default)]
pub struct DeferredDispatcher {
    jobs: Arc<Mutex<Vec<Option<RequestJob>>>>,
}

impl DeferredDispatcher {
    pub fn queued(&self) -> usize {
        self.jobs.lock().unwrap().iter().filter(|j| j.is_some()).count()
    }

    /// Runs the `index`-th dispatched job (dispatch order, zero-based).
    pub fn complete(&self, index: usize) {
        let job = self.jobs.lock().unwrap()[index].take();
        if let Some(job) = job {
            job();
        }
    }

    pub fn complete_all(&self) {
        let count = self.jobs.lock().unwrap().len();
        for index in 0..count {
            self.complete(index);
        }
    }
}

impl RequestDispatcher for DeferredDispatcher {
    fn dispatch(&self, job: RequestJob) {
        self.jobs.lock().unwrap().push(Some(job));
    }
}
