pub mod recognition_outcome;
pub mod recognition_service;
pub mod request_dispatcher;
