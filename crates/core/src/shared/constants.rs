use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000/";
pub const REGISTER_ENDPOINT: &str = "register";
pub const RECOGNIZE_ENDPOINT: &str = "recognize";

/// Multipart attachment name and MIME type for every submitted still.
pub const STILL_FILE_NAME: &str = "face.jpg";
pub const STILL_MIME_TYPE: &str = "image/jpeg";

/// Matches the browser default for `toDataURL("image/jpeg")`.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Lifetime of a status message before the UI clears it.
pub const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(5);

pub const OVERLAY_COLOR: [u8; 3] = [0, 255, 0];
pub const OVERLAY_LINE_WIDTH: u32 = 3;

pub const DEFAULT_DISPLAY_WIDTH: f64 = 640.0;
pub const DEFAULT_DISPLAY_HEIGHT: f64 = 480.0;

pub const NAME_REQUIRED_TEXT: &str = "Please enter a name.";
pub const CAMERA_NOT_ACTIVE_TEXT: &str = "Camera is not active.";
pub const CAMERA_START_FAILED_PREFIX: &str = "Unable to start camera";
pub const REGISTER_FAILED_TEXT: &str = "Registration failed";
pub const REGISTER_ERROR_PREFIX: &str = "Error during registration";
pub const RECOGNIZE_DONE_TEXT: &str = "Recognition complete";
pub const RECOGNIZE_FAILED_TEXT: &str = "Recognition failed";
pub const RECOGNIZE_ERROR_PREFIX: &str = "Error during recognition";
pub const GEOMETRY_ERROR_PREFIX: &str = "Cannot map face location";
pub const REGISTER_NOT_OPEN_TEXT: &str = "Registration is not open.";
pub const REGISTRATION_OPEN_TEXT: &str = "Finish or cancel registration first.";
