//! Utility functions
//!
//! Provides logging setup and network deadline helpers.

pub mod logging;
pub mod network;
