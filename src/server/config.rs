//! Server configuration
//!
//! Settings are assembled from built-in defaults, an optional `ftserver.toml` in
//! the working directory, and `FTSERVER_*` environment variables. The control port
//! always comes from the command line. With no file and no variables present the
//! server runs on defaults alone.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::transfer::TransferSettings;
use crate::utils::network::deadline_from_secs;

const CONFIG_FILE: &str = "ftserver";
const ENV_PREFIX: &str = "FTSERVER";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_BACKLOG: u32 = 5;
const DEFAULT_SERVER_ROOT: &str = ".";
const DEFAULT_CHUNK_SIZE: usize = 1024;
const DEFAULT_MAX_MESSAGE_LEN: usize = 1024;
const DEFAULT_IO_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Server configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address the control listener binds to; all local addresses by default
    pub bind_address: String,

    /// Port for the control listener
    pub control_port: u16,

    /// Pending-connection queue length for the control listener
    pub backlog: u32,

    /// Directory whose entries are listed and served
    pub server_root: String,

    /// Largest slice handed to one write on a data connection
    pub chunk_size: usize,

    /// Largest control message read in one handshake step
    pub max_message_len: usize,

    /// Deadline for each control read and data write; 0 disables
    pub io_timeout_secs: u64,

    /// Deadline for resolving and connecting the data connection; 0 disables
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            control_port: 0,
            backlog: DEFAULT_BACKLOG,
            server_root: DEFAULT_SERVER_ROOT.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            io_timeout_secs: DEFAULT_IO_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Load configuration for a server listening on `control_port`.
    pub fn load(control_port: u16) -> Result<Self, ConfigError> {
        let sources = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX));
        Self::assemble(sources, control_port)
    }

    fn assemble(
        sources: ConfigBuilder<DefaultState>,
        control_port: u16,
    ) -> Result<Self, ConfigError> {
        let settings = sources
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("backlog", i64::from(DEFAULT_BACKLOG))?
            .set_default("server_root", DEFAULT_SERVER_ROOT)?
            .set_default("chunk_size", DEFAULT_CHUNK_SIZE as i64)?
            .set_default("max_message_len", DEFAULT_MAX_MESSAGE_LEN as i64)?
            .set_default("io_timeout_secs", DEFAULT_IO_TIMEOUT_SECS as i64)?
            .set_default("connect_timeout_secs", DEFAULT_CONNECT_TIMEOUT_SECS as i64)?
            .set_override("control_port", i64::from(control_port))?
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.backlog == 0 {
            return Err(ConfigError::Message(
                "backlog must be greater than 0".into(),
            ));
        }

        if self.server_root.is_empty() {
            return Err(ConfigError::Message("server_root cannot be empty".into()));
        }

        if self.chunk_size == 0 {
            return Err(ConfigError::Message(
                "chunk_size must be greater than 0".into(),
            ));
        }

        if self.max_message_len == 0 {
            return Err(ConfigError::Message(
                "max_message_len must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get server root as PathBuf
    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    /// Deadline for a single control connection read
    pub fn read_timeout(&self) -> Option<Duration> {
        deadline_from_secs(self.io_timeout_secs)
    }

    pub fn transfer_settings(&self) -> TransferSettings {
        TransferSettings {
            chunk_size: self.chunk_size,
            connect_timeout: deadline_from_secs(self.connect_timeout_secs),
            write_timeout: deadline_from_secs(self.io_timeout_secs),
        }
    }
}
