//! Module `data_channel`
//!
//! Manages the outbound data connection a session opens back to its client.
//! The server always connects to the client (active mode) using the hostname
//! and port the client reported on the control connection.

use std::cmp;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use log::{debug, info, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, lookup_host};

use crate::error::TransferError;
use crate::utils::network::with_deadline;

/// Tuning for data connections, derived from the server configuration.
#[derive(Debug, Clone, Copy)]
pub struct TransferSettings {
    /// Largest slice handed to a single write call.
    pub chunk_size: usize,
    pub connect_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            connect_timeout: Some(Duration::from_secs(10)),
            write_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// A single data connection. Carries exactly one payload and is then closed.
pub struct DataChannel<S = TcpStream> {
    stream: S,
    settings: TransferSettings,
    sent: usize,
}

impl DataChannel<TcpStream> {
    /// Resolves `host` and connects to `port` on the first address that accepts.
    ///
    /// # Errors
    ///
    /// * `UnknownHost` - resolution failed or returned no addresses
    /// * `Connect` - every resolved address refused the connection
    /// * `ConnectTimeout` - resolution or a connect attempt exceeded the deadline
    pub async fn open(
        host: &str,
        port: u16,
        settings: TransferSettings,
    ) -> Result<Self, TransferError> {
        let addrs: Vec<SocketAddr> =
            match with_deadline(settings.connect_timeout, lookup_host((host, port))).await {
                Ok(Ok(addrs)) => addrs.collect(),
                Ok(Err(e)) => {
                    return Err(TransferError::UnknownHost {
                        host: host.to_string(),
                        source: Some(e),
                    });
                }
                Err(_) => {
                    return Err(TransferError::ConnectTimeout {
                        host: host.to_string(),
                        port,
                    });
                }
            };

        if addrs.is_empty() {
            return Err(TransferError::UnknownHost {
                host: host.to_string(),
                source: None,
            });
        }

        let mut last_error = io::Error::new(io::ErrorKind::AddrNotAvailable, "no address tried");
        for addr in addrs {
            match with_deadline(settings.connect_timeout, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        debug!("Failed to set TCP_NODELAY on data connection: {}", e);
                    }
                    info!("Data connection established with {} ({})", host, addr);
                    return Ok(Self::from_stream(stream, settings));
                }
                Ok(Err(e)) => {
                    debug!("Connect to {} failed: {}", addr, e);
                    last_error = e;
                }
                Err(_) => {
                    return Err(TransferError::ConnectTimeout {
                        host: host.to_string(),
                        port,
                    });
                }
            }
        }

        Err(TransferError::Connect {
            host: host.to_string(),
            port,
            source: last_error,
        })
    }
}

impl<S: AsyncWrite + Unpin> DataChannel<S> {
    /// Wraps an already connected stream.
    pub fn from_stream(stream: S, settings: TransferSettings) -> Self {
        Self {
            stream,
            settings,
            sent: 0,
        }
    }

    /// Sends the whole payload, returning only once every byte was accepted.
    ///
    /// A single write may take fewer bytes than offered; the loop keeps going from
    /// the first unsent byte until the cumulative count reaches the payload length.
    pub async fn send(&mut self, payload: &[u8]) -> Result<usize, TransferError> {
        let chunk_size = self.settings.chunk_size.max(1);
        let deadline = self.settings.write_timeout;
        let mut total = 0;

        while total < payload.len() {
            let end = cmp::min(total + chunk_size, payload.len());
            let written = match with_deadline(deadline, self.stream.write(&payload[total..end])).await
            {
                Ok(Ok(0)) => {
                    return Err(TransferError::Write(io::Error::from(
                        io::ErrorKind::WriteZero,
                    )));
                }
                Ok(Ok(n)) => n,
                Ok(Err(e)) => return Err(TransferError::Write(e)),
                Err(_) => return Err(TransferError::WriteTimeout { sent: total }),
            };
            total += written;
            trace!("Sent {}/{} bytes", total, payload.len());
        }

        self.sent += total;
        Ok(total)
    }

    /// Streams `source` to the peer chunk by chunk until it is exhausted.
    pub async fn send_from<R>(&mut self, source: &mut R) -> Result<usize, TransferError>
    where
        R: AsyncRead + Unpin,
    {
        let mut buffer = vec![0u8; self.settings.chunk_size.max(1)];
        let mut total = 0;

        loop {
            let n = source.read(&mut buffer).await.map_err(TransferError::Read)?;
            if n == 0 {
                break;
            }
            total += self.send(&buffer[..n]).await?;
        }

        Ok(total)
    }

    /// Total bytes sent over this channel so far.
    #[cfg(test)]
    fn bytes_sent(&self) -> usize {
        self.sent
    }

    /// Flushes and shuts the connection down, returning the bytes sent.
    ///
    /// Errors here are ignored: the peer may already be gone after a failed send.
    pub async fn close(mut self) -> usize {
        let _ = self.stream.flush().await;
        if let Err(e) = self.stream.shutdown().await {
            debug!("Data connection shutdown: {}", e);
        }
        self.sent
    }

    /// Unwraps the channel, returning the underlying stream.
    #[cfg(test)]
    fn into_inner(self) -> S {
        self.stream
    }
}
