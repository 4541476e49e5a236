use std::thread;

use crate::recognition::domain::request_dispatcher::{RequestDispatcher, RequestJob};

/// Runs every request on its own background thread.
///
/// Fire-and-forget: no pooling, no cancellation, no join.
pub struct ThreadDispatcher;

impl ThreadDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ThreadDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestDispatcher for ThreadDispatcher {
    fn dispatch(&self, job: RequestJob) {
        thread::spawn(job);
    }
}
