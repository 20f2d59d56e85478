//! Session handler
//!
//! Drives one control connection through the handshake:
//! hostname, ack, command, ack or reject, data port, filename (get only),
//! then the payload over a fresh data connection back to the client.
//!
//! The order of these steps is fixed; clients wait for each reply before sending
//! the next message.

use std::net::SocketAddr;
use std::path::Path;

use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::SessionError;
use crate::protocol::responses::HANDSHAKE_ACK;
use crate::protocol::{CommandKind, ParsedCommand, Request, parse_command, parse_data_port};
use crate::server::ServerConfig;
use crate::session::{Session, SessionOutcome, SessionState};
use crate::storage::{directory_listing, find_entry, open_file, render_listing};
use crate::transfer::DataChannel;
use crate::utils::network::with_deadline;

/// Serves the single request carried by `stream`, then closes it.
///
/// The control connection is shut down on every path, including errors.
pub async fn handle_session<S>(
    stream: S,
    peer: SocketAddr,
    config: &ServerConfig,
) -> Result<SessionOutcome, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut session = Session::new(stream, peer, config);
    let result = session.run().await;
    session.close().await;
    result
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    async fn run(&mut self) -> Result<SessionOutcome, SessionError> {
        let raw = self.read_message().await?;
        let hostname = String::from_utf8_lossy(&raw).into_owned();
        debug!(
            "Session {}: client reports hostname {:?}",
            self.peer, hostname
        );
        self.hostname = Some(hostname);
        self.reply(HANDSHAKE_ACK).await?;
        self.transition(SessionState::AwaitCommand);

        let raw = self.read_message().await?;
        let kind = match parse_command(&raw) {
            ParsedCommand::Valid(kind) => kind,
            ParsedCommand::Invalid(reason) => {
                self.transition(SessionState::Rejected);
                info!(
                    "Session {}: rejected command {:?}",
                    self.peer,
                    String::from_utf8_lossy(&raw)
                );
                self.reply(reason.as_bytes()).await?;
                return Ok(SessionOutcome::Rejected);
            }
        };
        self.command = Some(kind);
        self.reply(kind.token().as_bytes()).await?;
        info!("Session {}: accepted command {}", self.peer, kind);
        self.transition(SessionState::AwaitDataPort);

        let raw = self.read_message().await?;
        self.data_port = Some(parse_data_port(&raw));

        let request = match kind {
            CommandKind::List => Request::ListDirectory,
            CommandKind::Get => {
                self.transition(SessionState::AwaitFilename);
                let raw = self.read_message().await?;
                let filename = String::from_utf8_lossy(&raw).into_owned();
                self.filename = Some(filename.clone());
                Request::GetFile(filename)
            }
        };

        self.transition(SessionState::Transferring);
        self.serve(&request).await
    }

    /// Opens the data connection and sends the payload for `request`.
    async fn serve(&mut self, request: &Request) -> Result<SessionOutcome, SessionError> {
        let host = self.hostname.as_deref().unwrap_or_default();
        let port = self.data_port.unwrap_or_default();

        let mut channel = DataChannel::open(host, port, self.transfer).await?;

        let result = match request {
            Request::ListDirectory => {
                info!("Sending directory to client {}:{}", host, port);
                send_listing(&self.root, &mut channel).await
            }
            Request::GetFile(filename) => {
                info!("Sending {} to client {}:{}", filename, host, port);
                send_file(&self.root, filename, &mut channel).await
            }
        };

        let sent = channel.close().await;
        info!(
            "Data connection to {}:{} closed after {} bytes",
            host, port, sent
        );
        result
    }

    /// Reads one control message: whatever a single read returns.
    ///
    /// Messages carry no delimiter. A client that sends the data port and the
    /// filename back to back may have both land in one read, in which case the
    /// port parses from the leading digits and the filename read waits for the
    /// read deadline.
    async fn read_message(&mut self) -> Result<Vec<u8>, SessionError> {
        let state = self.state;
        let n = match with_deadline(self.read_timeout, self.stream.read(&mut self.buffer)).await {
            Ok(Ok(0)) => return Err(SessionError::Disconnected(state)),
            Ok(Ok(n)) => n,
            Ok(Err(source)) => return Err(SessionError::Io { state, source }),
            Err(_) => return Err(SessionError::Timeout(state)),
        };
        Ok(self.buffer[..n].to_vec())
    }

    async fn reply(&mut self, message: &[u8]) -> Result<(), SessionError> {
        let state = self.state;
        let write = async {
            match self.stream.write_all(message).await {
                Ok(()) => self.stream.flush().await,
                Err(e) => Err(e),
            }
        };
        match with_deadline(self.transfer.write_timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(SessionError::Io { state, source }),
            Err(_) => Err(SessionError::Timeout(state)),
        }
    }

    async fn close(&mut self) {
        debug!(
            "Session {}: closing in {} (command {:?}, data port {:?}, file {:?})",
            self.peer, self.state, self.command, self.data_port, self.filename
        );
        if let Err(e) = self.stream.shutdown().await {
            debug!("Session {}: control shutdown: {}", self.peer, e);
        }
        self.transition(SessionState::Closed);
    }
}

async fn send_listing(
    root: &Path,
    channel: &mut DataChannel,
) -> Result<SessionOutcome, SessionError> {
    let entries = directory_listing(root).await?;
    let bytes = channel.send(&render_listing(&entries)).await?;
    Ok(SessionOutcome::Listed {
        entries: entries.len(),
        bytes,
    })
}

/// Sends the entry named `filename` if the served directory holds one.
///
/// An absent file is not reported to the client: the data connection is simply
/// closed without payload.
async fn send_file(
    root: &Path,
    filename: &str,
    channel: &mut DataChannel,
) -> Result<SessionOutcome, SessionError> {
    let Some(path) = find_entry(root, filename).await? else {
        warn!("{} is not a valid filename", filename);
        return Ok(SessionOutcome::NotFound {
            filename: filename.to_string(),
        });
    };

    let mut file = open_file(&path).await?;
    let bytes = channel.send_from(&mut file).await?;
    Ok(SessionOutcome::Sent {
        filename: filename.to_string(),
        bytes,
    })
}
