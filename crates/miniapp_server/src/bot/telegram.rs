//! Minimal Telegram Bot API client (long polling).

use super::command::BotReply;
use async_trait::async_trait;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bot API endpoint.
const API_BASE: &str = "https://api.telegram.org";

/// Extra time allowed on top of the long-polling timeout.
const HTTP_GRACE: Duration = Duration::from_secs(10);

/// Error talking to the chat service.
#[derive(Debug, Display, From, Error)]
pub enum BotError {
    /// Transport failure.
    #[display("Telegram request failed: {_0}")]
    Http(reqwest::Error),

    /// The API answered with `ok: false`.
    #[display("Telegram API error: {_0}")]
    #[from(ignore)]
    Api(#[error(not(source))] String),
}

/// Incoming update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,
    /// New message, if this update carries one.
    #[serde(default)]
    pub message: Option<Message>,
}

/// Chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier within the chat.
    pub message_id: i64,
    /// Chat the message was sent in.
    pub chat: Chat,
    /// Sender, absent for channel posts.
    #[serde(default)]
    pub from: Option<User>,
    /// Text body.
    #[serde(default)]
    pub text: Option<String>,
}

/// Chat reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    /// Chat identifier.
    pub id: i64,
}

/// Telegram user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: i64,
    /// First name.
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Username without the leading `@`.
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, BotError> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(BotError::Api(
                self.description
                    .unwrap_or_else(|| "request was not successful".to_string()),
            )),
        }
    }
}

/// Renders the `sendMessage` payload for a reply.
pub fn send_message_body(chat_id: i64, reply: &BotReply) -> serde_json::Value {
    let mut body = json!({
        "chat_id": chat_id,
        "text": reply.text(),
    });
    if let Some(mode) = reply.parse_mode() {
        body["parse_mode"] = json!(mode.as_str());
    }
    if let Some(button) = reply.web_app_button() {
        body["reply_markup"] = json!({
            "inline_keyboard": [[{
                "text": button.label(),
                "web_app": { "url": button.url() },
            }]]
        });
    }
    body
}

/// Transport used by the dispatcher.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fetches updates with ids at or above `offset`.
    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError>;

    /// Sends a reply to a chat.
    async fn send_reply(&self, chat_id: i64, reply: &BotReply) -> Result<(), BotError>;
}

/// Bot API client over HTTPS.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    /// Contains the bot token; never logged.
    base_url: String,
    poll_timeout: Duration,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("poll_timeout", &self.poll_timeout)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Creates a client for the bot identified by `token`.
    pub fn new(token: &str, poll_timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("{}/bot{}", API_BASE, token),
            poll_timeout,
        }
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<T, BotError> {
        let response: ApiResponse<T> = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| e.without_url())?
            .json()
            .await
            .map_err(|e| e.without_url())?;
        response.into_result()
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    #[instrument(skip(self))]
    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError> {
        let body = json!({
            "offset": offset,
            "timeout": self.poll_timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        let updates: Vec<Update> = self
            .call("getUpdates", &body, self.poll_timeout + HTTP_GRACE)
            .await?;
        debug!(count = updates.len(), "Fetched updates");
        Ok(updates)
    }

    #[instrument(skip(self, reply))]
    async fn send_reply(&self, chat_id: i64, reply: &BotReply) -> Result<(), BotError> {
        let _sent: serde_json::Value = self
            .call("sendMessage", &send_message_body(chat_id, reply), HTTP_GRACE)
            .await?;
        debug!("Reply sent");
        Ok(())
    }
}
