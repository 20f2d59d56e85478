//! Error types
//!
//! Defines the error taxonomy for each module of the file server. Startup errors
//! are fatal to the process; every other error is scoped to a single session.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

use crate::session::SessionState;

/// Errors raised while bringing the listener up. The process exits on any of these.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid bind address {0}")]
    InvalidAddress(String),

    #[error("failed to create listening socket: {0}")]
    Socket(#[source] io::Error),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to listen on {addr}: {source}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Data connection errors.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("no such host: {host}")]
    UnknownHost {
        host: String,
        #[source]
        source: Option<io::Error>,
    },

    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("timed out connecting to {host}:{port}")]
    ConnectTimeout { host: String, port: u16 },

    #[error("error writing to data connection: {0}")]
    Write(#[source] io::Error),

    #[error("error reading payload source: {0}")]
    Read(#[source] io::Error),

    #[error("data connection write timed out after {sent} bytes")]
    WriteTimeout { sent: usize },
}

impl TransferError {
    /// True when the data connection could never be established.
    pub fn is_connect_error(&self) -> bool {
        matches!(
            self,
            TransferError::UnknownHost { .. }
                | TransferError::Connect { .. }
                | TransferError::ConnectTimeout { .. }
        )
    }
}

/// Directory and file access errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Errors that abort one session. None of these reach the listener loop.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("control connection error while in {state}: {source}")]
    Io {
        state: SessionState,
        #[source]
        source: io::Error,
    },

    #[error("peer closed the control connection while in {0}")]
    Disconnected(SessionState),

    #[error("timed out waiting for the peer while in {0}")]
    Timeout(SessionState),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
