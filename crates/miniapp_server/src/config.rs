//! Application configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file,
//! then environment variables (`HOST`, `PORT`, `BOT_TOKEN`,
//! `WEB_APP_URL`), then command-line flags.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Full application configuration.
#[derive(Debug, Clone, Default, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    server: ServerConfig,

    /// Chat bot settings.
    #[serde(default)]
    bot: BotConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,
}

/// Telegram bot settings.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot API token from BotFather. The bot does not start without one.
    #[serde(default)]
    token: Option<String>,

    /// Public URL of the embedded game page, opened by the Play button.
    #[serde(default = "default_web_app_url")]
    web_app_url: String,

    /// Long-polling timeout for `getUpdates`.
    #[serde(default = "default_poll_timeout_secs")]
    poll_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_web_app_url() -> String {
    "https://your-app-url.com/game".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            web_app_url: default_web_app_url(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl BotConfig {
    /// Creates a bot configuration.
    pub fn new(token: Option<String>, web_app_url: String) -> Self {
        Self {
            token,
            web_app_url,
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from an optional file and the process environment.
    ///
    /// A missing file is not an error; defaults are used instead.
    #[instrument(skip(path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                info!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.with_env(|name| std::env::var(name).ok())
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Applies environment overrides using `lookup` to read variables.
    #[instrument(skip(self, lookup))]
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid PORT {:?}: {}", port, e)))?;
        }
        if let Some(token) = lookup("BOT_TOKEN").filter(|t| !t.trim().is_empty()) {
            self.bot.token = Some(token);
        }
        if let Some(url) = lookup("WEB_APP_URL") {
            self.bot.web_app_url = url;
        }
        debug!(
            host = %self.server.host,
            port = self.server.port,
            bot_configured = self.bot.token.is_some(),
            "Applied environment overrides"
        );
        Ok(self)
    }

    /// Applies command-line overrides for the HTTP server.
    pub fn with_server_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    /// `host:port` string for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
