pub type RequestJob = Box<dyn FnOnce() + Send + 'static>;

/// Decides where a service request runs.
///
/// This is a port; infrastructure provides the threaded implementation.
/// A job reports its own result, so dispatch returns nothing.
pub trait RequestDispatcher: Send {
    fn dispatch(&self, job: RequestJob);
}

/// Runs each job to completion on the caller's thread.
pub struct InlineDispatcher;

impl RequestDispatcher for InlineDispatcher {
    fn dispatch(&self, job: RequestJob) {
        job();
    }
}
