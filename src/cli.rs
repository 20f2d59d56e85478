//! Command-line arguments

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "ftserver",
    version,
    about = "Serves directory listings and files over per-request data connections."
)]
pub struct Cli {
    /// Port to listen on for control connections
    pub port: u16,
}
