//! Tic-tac-toe Mini App server.
//!
//! Presentation adapters around [`miniapp_tictactoe`]:
//!
//! - **HTTP**: JSON API for creating games and making moves, plus the
//!   embedded browser client served at `/game`
//! - **Bot**: Telegram bot that opens the browser client as a web app
//! - **Config**: layered settings from defaults, TOML, environment and CLI
//!
//! # Example
//!
//! ```no_run
//! use miniapp_server::{AppState, serve};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! serve(listener, Arc::new(AppState::default()), async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bot;
pub mod cli;
pub mod config;
pub mod http;

pub use bot::{BotCommand, ChatTransport, Dispatcher, TelegramClient, run_bot};
pub use cli::{Cli, Command};
pub use config::{AppConfig, BotConfig, ConfigError, ServerConfig};
pub use http::{ApiError, AppState, create_app, serve};
