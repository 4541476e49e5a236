use thiserror::Error;

/// Every failure a user-triggered operation can end in.
///
/// None of these are fatal: each is turned into exactly one error status
/// message at the point of the triggering action.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Device unavailable, permission denied, or constraint unsatisfiable.
    #[error("camera error: {0}")]
    Camera(String),
    #[error("no frame available: camera is not active")]
    NoFrameAvailable,
    #[error("{0}")]
    Validation(String),
    /// The service answered with a non-2xx status.
    #[error("service error (HTTP {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Service { status: u16, detail: Option<String> },
    /// The request could not complete, or its reply could not be read.
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid geometry: native frame size is {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },
    #[error("failed to encode still: {0}")]
    Encode(String),
}
