pub mod date_context;
pub mod response;
