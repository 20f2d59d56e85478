//! Module `state`
//!
//! Defines the per-connection `Session` value and the states of its handshake.
//! A session is created for one accepted control connection, serves exactly one
//! command, and is dropped afterwards; nothing in it is shared with other sessions.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use log::debug;

use crate::protocol::CommandKind;
use crate::server::ServerConfig;
use crate::transfer::TransferSettings;

/// Handshake position of a session. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitHostname,
    AwaitCommand,
    Rejected,
    AwaitDataPort,
    AwaitFilename,
    Transferring,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// State of one control connection.
pub struct Session<S> {
    pub(crate) stream: S,
    pub(crate) peer: SocketAddr,
    pub(crate) state: SessionState,
    pub(crate) buffer: Vec<u8>,
    pub(crate) hostname: Option<String>,
    pub(crate) command: Option<CommandKind>,
    pub(crate) data_port: Option<u16>,
    pub(crate) filename: Option<String>,
    pub(crate) root: PathBuf,
    pub(crate) read_timeout: Option<Duration>,
    pub(crate) transfer: TransferSettings,
}

impl<S> Session<S> {
    pub fn new(stream: S, peer: SocketAddr, config: &ServerConfig) -> Self {
        Self {
            stream,
            peer,
            state: SessionState::AwaitHostname,
            buffer: vec![0; config.max_message_len],
            hostname: None,
            command: None,
            data_port: None,
            filename: None,
            root: config.server_root_path(),
            read_timeout: config.read_timeout(),
            transfer: config.transfer_settings(),
        }
    }

    pub(crate) fn transition(&mut self, next: SessionState) {
        debug!("Session {}: {} -> {}", self.peer, self.state, next);
        self.state = next;
    }
}
