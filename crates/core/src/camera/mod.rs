pub mod domain;
pub mod infrastructure;
pub mod media_stream_controller;
pub mod video_element;
