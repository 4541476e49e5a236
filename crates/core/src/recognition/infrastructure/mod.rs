pub mod http_recognition_service;
pub mod thread_dispatcher;
