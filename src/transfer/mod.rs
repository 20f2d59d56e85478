//! Transfer module
//!
//! Handles the outbound data connection that carries a listing or file payload.

pub mod data_channel;

pub use data_channel::{DataChannel, TransferSettings};
