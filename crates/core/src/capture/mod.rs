pub mod captured_still;
pub mod domain;
pub mod frame_capturer;
pub mod infrastructure;
