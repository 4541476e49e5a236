pub mod camera_device;
pub mod facing_mode;
pub mod frame_source;
pub mod media_stream;
