pub mod domain;
pub mod infrastructure;
pub mod recognition_session;
