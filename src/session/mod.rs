//! Session management
//!
//! One session per accepted control connection: handshake, command dispatch,
//! payload transfer, teardown.

pub mod handler;
pub mod results;
pub mod state;

pub use handler::handle_session;
pub use results::SessionOutcome;
pub use state::{Session, SessionState};
