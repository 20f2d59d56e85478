//! ftserver - Entry Point
//!
//! Listens for control connections and answers each with a directory listing or
//! a file sent over a data connection opened back to the client.

use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use log::{error, info};

use ftserver::cli::Cli;
use ftserver::error::StartupError;
use ftserver::utils::logging::setup_logging;
use ftserver::{Server, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    setup_logging();

    info!("Launching file server...");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server startup failed: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let config = ServerConfig::load(cli.port)?;
    let server = Server::bind(config)?;
    server.start().await;
    Ok(())
}
