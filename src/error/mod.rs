//! Error handling
//!
//! Defines error types and reporting for the file server.

pub mod handlers;
pub mod types;

pub use handlers::handle_session_error;
pub use types::*;
