//! Session result types
//!
//! Defines how a session that ran to completion ended.

use std::fmt;

/// Outcome of a session that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Directory listing delivered.
    Listed { entries: usize, bytes: usize },
    /// File delivered.
    Sent { filename: String, bytes: usize },
    /// Requested file absent; the data connection was closed without payload.
    NotFound { filename: String },
    /// Unrecognised command; no data connection was opened.
    Rejected,
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::Listed { entries, bytes } => {
                write!(f, "listed {} entries ({} bytes)", entries, bytes)
            }
            SessionOutcome::Sent { filename, bytes } => {
                write!(f, "sent {} ({} bytes)", filename, bytes)
            }
            SessionOutcome::NotFound { filename } => write!(f, "{} not found", filename),
            SessionOutcome::Rejected => write!(f, "command rejected"),
        }
    }
}
