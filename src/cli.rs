//! Command-line interface for power4.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Power4 - Connect-4 in the browser
#[derive(Parser, Debug)]
#[command(name = "power4")]
#[command(about = "Serves a browser-playable Connect-4 game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to a TOML config file (optional)
        #[arg(short, long, default_value = "power4.toml")]
        config: PathBuf,

        /// Host to bind to, overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to, overrides PORT and the config file
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the effective configuration as TOML
    PrintConfig {
        /// Path to a TOML config file (optional)
        #[arg(short, long, default_value = "power4.toml")]
        config: PathBuf,
    },
}
