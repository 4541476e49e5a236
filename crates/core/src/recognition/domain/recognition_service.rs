use crate::capture::captured_still::CapturedStill;
use crate::recognition::domain::recognition_outcome::{RecognitionOutcome, RegisterReply};
use crate::shared::error::ClientError;

/// The remote face registration/recognition service.
///
/// Calls block until the service answers; callers decide which thread
/// that happens on. Failures are [`ClientError::Service`] for non-2xx
/// answers and [`ClientError::Network`] when no usable answer arrived.
pub trait RecognitionService: Send + Sync {
    fn register(&self, name: &str, still: &CapturedStill) -> Result<RegisterReply, ClientError>;

    fn recognize(&self, still: &CapturedStill) -> Result<RecognitionOutcome, ClientError>;
}
