//! Tic-tac-toe Mini App - unified CLI
//!
//! Runs the HTTP API, the Telegram bot, or both.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use miniapp_server::{AppConfig, AppState, Cli, Command, run_bot, serve};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info,miniapp_server=debug,miniapp_tictactoe=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    let config = AppConfig::load(Some(cli.config.as_path()))?;

    match cli.command {
        Command::Http { host, port } => {
            run_http_server(config.with_server_overrides(host, port)).await
        }
        Command::Bot => {
            run_bot(config.bot(), wait_for_shutdown(shutdown_channel())).await;
            Ok(())
        }
        Command::Run { host, port } => run_all(config.with_server_overrides(host, port)).await,
    }
}

/// Run the HTTP API and browser client
async fn run_http_server(config: AppConfig) -> Result<()> {
    info!("Starting Tic-Tac-Toe Mini App API");
    let listener = TcpListener::bind(config.bind_address()).await?;
    serve(
        listener,
        Arc::new(AppState::default()),
        wait_for_shutdown(shutdown_channel()),
    )
    .await?;
    Ok(())
}

/// Run the HTTP server and the bot side by side
async fn run_all(config: AppConfig) -> Result<()> {
    info!("Starting Tic-Tac-Toe Mini App API and bot");
    let listener = TcpListener::bind(config.bind_address()).await?;
    let shutdown = shutdown_channel();

    let http = serve(
        listener,
        Arc::new(AppState::default()),
        wait_for_shutdown(shutdown.clone()),
    );
    let bot = run_bot(config.bot(), wait_for_shutdown(shutdown));

    let (http_result, ()) = tokio::join!(http, bot);
    http_result?;
    Ok(())
}

/// Spawns the Ctrl+C listener and returns a receiver that flips to `true` on shutdown.
fn shutdown_channel() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, stopping...");
                let _ = tx.send(true);
            }
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                // Keep the sender alive so receivers do not treat this as shutdown.
                std::future::pending::<()>().await;
            }
        }
    });
    rx
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}
