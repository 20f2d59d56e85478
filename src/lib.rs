pub mod cli;
pub mod error;
pub mod protocol;
pub mod server;
pub mod session;
pub mod storage;
pub mod transfer;
pub mod utils;

pub use server::{Server, ServerConfig};
