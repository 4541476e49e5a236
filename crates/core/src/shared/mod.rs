pub mod constants;
pub mod error;
pub mod face_location;
pub mod frame;
pub mod geometry;
pub mod status_message;
