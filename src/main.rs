//! Power4 - command-line entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use power4::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => {
            let config = ServerConfig::load(Some(&config))?.with_overrides(host, port);
            init_tracing(&config);
            info!(addr = %config.bind_addr(), "Starting Power4 server");
            power4::serve(&config).await
        }
        Command::PrintConfig { config } => {
            let config = ServerConfig::load(Some(&config))?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(config: &ServerConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();
}
