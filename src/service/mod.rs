pub mod completion_provider;
pub mod frame;
pub mod history_service;
pub mod negotiation;
pub mod prompt;
