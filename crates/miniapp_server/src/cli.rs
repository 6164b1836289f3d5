//! Command-line interface for the Mini App.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tic-tac-toe Mini App - REST API, browser client and Telegram bot
#[derive(Parser, Debug)]
#[command(name = "miniapp")]
#[command(about = "Tic-tac-toe Mini App server and chat bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (optional; missing file uses defaults)
    #[arg(short, long, global = true, default_value = "miniapp.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API and browser client
    Http {
        /// Host to bind to (overrides config and HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the Telegram bot (long polling)
    Bot,

    /// Run the HTTP server and the bot together
    Run {
        /// Host to bind to (overrides config and HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
