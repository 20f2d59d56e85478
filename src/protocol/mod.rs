//! Control protocol
//!
//! Command tokens, fixed replies, and parsing of control messages.

pub mod commands;
pub mod parser;
pub mod responses;

pub use commands::{CommandKind, ParsedCommand, Request};
pub use parser::{parse_command, parse_data_port};
