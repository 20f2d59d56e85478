//! Error handlers
//!
//! Reports session-scoped failures to the operator.

use std::net::SocketAddr;

use log::{error, warn};

use crate::error::types::{SessionError, TransferError};

/// Log a session error at a level matching its class.
///
/// Peers that hang up or stall are routine, so they are warnings; failures on our
/// side of the connection are errors.
pub fn handle_session_error(peer: &SocketAddr, err: &SessionError) {
    match err {
        SessionError::Disconnected(_) | SessionError::Timeout(_) => {
            warn!("Session {}: {}", peer, err)
        }
        SessionError::Transfer(e) if e.is_connect_error() => {
            error!("Session {}: data connection failed: {}", peer, e)
        }
        SessionError::Transfer(TransferError::Write(e)) => {
            error!("Session {}: ERROR writing to socket: {}", peer, e)
        }
        _ => error!("Session {}: {}", peer, err),
    }
}
