//! Control protocol constants
//!
//! Fixed tokens and replies exchanged on the control connection.

/// Single byte sent after the hostname is received, pacing the client.
pub const HANDSHAKE_ACK: &[u8] = b" ";

pub const LIST_TOKEN: &str = "-l";
pub const GET_TOKEN: &str = "-g";

/// Reply to any unrecognised command. The session ends after sending it.
pub const INVALID_COMMAND: &str = "Invalid command. Please send \"-l\" or \"-g\".";
