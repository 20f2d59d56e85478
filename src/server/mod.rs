//! Server core functionality
//!
//! Configuration and the control listener.

pub mod config;
pub mod core;

pub use self::config::ServerConfig;
pub use self::core::Server;
