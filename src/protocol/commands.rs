//! Module `commands`
//!
//! Defines the two commands of the control protocol and the data structures
//! the session builds from them once the handshake has delivered every argument.

use std::fmt;

use crate::protocol::responses::{GET_TOKEN, LIST_TOKEN};

/// A command token as accepted on the control connection.
///
/// The filename of a get request arrives in a later handshake step, so the parser
/// only decides which command was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    List,
    Get,
}

impl CommandKind {
    /// The literal token the client sends, echoed back as acknowledgement.
    pub fn token(&self) -> &'static str {
        match self {
            CommandKind::List => LIST_TOKEN,
            CommandKind::Get => GET_TOKEN,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Result of validating a raw control message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Valid(CommandKind),
    Invalid(&'static str),
}

/// A fully specified request, ready to be served over a data connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListDirectory,
    GetFile(String),
}
