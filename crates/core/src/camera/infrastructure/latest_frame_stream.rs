use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::camera::domain::frame_source::FrameSource;
use crate::camera::domain::media_stream::MediaStream;
use crate::shared::frame::Frame;
use crate::shared::geometry::NativeSize;

/// How long a read waits for the first decoded frame after start.
pub const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Default)]
struct Slot {
    latest: Option<Frame>,
    /// Why the reader exited; set once.
    ended: Option<String>,
}

struct Shared {
    slot: Mutex<Slot>,
    fresh: Condvar,
    stopping: AtomicBool,
}

impl Shared {
    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A [`MediaStream`] that decodes its source continuously on a reader
/// thread and keeps only the newest frame.
///
/// Reads return whatever the camera delivered last, never a frame that sat
/// in a driver or demuxer queue since the previous read.
pub struct LatestFrameStream {
    label: String,
    size: NativeSize,
    shared: Arc<Shared>,
    reader: Option<JoinHandle<()>>,
    first_frame_timeout: Duration,
}

impl LatestFrameStream {
    pub fn spawn(source: impl FrameSource) -> Self {
        let label = source.label().to_string();
        let size = source.native_size();
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot::default()),
            fresh: Condvar::new(),
            stopping: AtomicBool::new(false),
        });

        let reader_shared = shared.clone();
        let reader = thread::spawn(move || run_reader(source, &reader_shared));
        log::debug!("Started frame reader for {label}");

        Self {
            label,
            size,
            shared,
            reader: Some(reader),
            first_frame_timeout: FIRST_FRAME_TIMEOUT,
        }
    }

    pub fn with_first_frame_timeout(mut self, timeout: Duration) -> Self {
        self.first_frame_timeout = timeout;
        self
    }
}

fn run_reader(mut source: impl FrameSource, shared: &Shared) {
    let reason = loop {
        if shared.stopping.load(Ordering::Relaxed) {
            break "stopped".to_string();
        }
        match source.next_frame() {
            Ok(Some(frame)) => {
                shared.slot().latest = Some(frame);
                shared.fresh.notify_all();
            }
            Ok(None) => break format!("end of stream on {}", source.label()),
            Err(e) => {
                log::warn!("Camera feed {} failed: {e}", source.label());
                break e.to_string();
            }
        }
    };
    // Close the device before readers learn the feed is over.
    drop(source);
    shared.slot().ended = Some(reason);
    shared.fresh.notify_all();
}

impl MediaStream for LatestFrameStream {
    fn label(&self) -> &str {
        &self.label
    }

    fn native_size(&self) -> NativeSize {
        if self.reader.is_some() {
            self.size
        } else {
            NativeSize::default()
        }
    }

    fn read_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        if self.reader.is_none() {
            return Err("stream stopped".into());
        }
        let (slot, _) = self
            .shared
            .fresh
            .wait_timeout_while(self.shared.slot(), self.first_frame_timeout, |slot| {
                slot.latest.is_none() && slot.ended.is_none()
            })
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(reason) = &slot.ended {
            return Err(format!("camera feed {} ended: {reason}", self.label).into());
        }
        match &slot.latest {
            Some(frame) => Ok(frame.clone()),
            None => Err(format!("no frame from {} yet", self.label).into()),
        }
    }

    fn stop(&mut self) {
        let Some(reader) = self.reader.take() else {
            return;
        };
        self.shared.stopping.store(true, Ordering::Relaxed);
        if reader.join().is_err() {
            log::warn!("Frame reader for {} panicked", self.label);
        }
        log::debug!("Closed camera input {}", self.label);
    }

    fn is_live(&self) -> bool {
        self.reader.is_some()
    }
}

impl Drop for LatestFrameStream {
    fn drop(&mut self) {
        self.stop();
    }
}
