//! Listener loop
//!
//! Binds the control port and hands every accepted connection to its own task,
//! so a slow or failing session never holds up the next accept.

use log::{error, info};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpSocket};

use crate::error::{StartupError, handle_session_error};
use crate::server::config::ServerConfig;
use crate::session::handle_session;

pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds and starts listening on the configured control address.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(config: ServerConfig) -> Result<Self, StartupError> {
        let ip: IpAddr = config
            .bind_address
            .parse()
            .map_err(|_| StartupError::InvalidAddress(config.bind_address.clone()))?;
        let addr = SocketAddr::new(ip, config.control_port);

        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(StartupError::Socket)?;
        socket.set_reuseaddr(true).map_err(StartupError::Socket)?;
        socket
            .bind(addr)
            .map_err(|source| StartupError::Bind { addr, source })?;
        let listener = socket
            .listen(config.backlog)
            .map_err(|source| StartupError::Listen { addr, source })?;

        info!(
            "Server bound to {} (backlog {}), serving {}",
            addr, config.backlog, config.server_root
        );

        Ok(Self {
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts control connections until the process is terminated.
    pub async fn start(&self) {
        info!(
            "Server listening for connection on port: {}",
            self.config.control_port
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    info!("Control connection received from {}", peer);
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        match handle_session(stream, peer, &config).await {
                            Ok(outcome) => info!("Session {} finished: {}", peer, outcome),
                            Err(e) => handle_session_error(&peer, &e),
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
