//! Telegram bot that offers the game through a web-app button.
//!
//! The bot long-polls for updates and answers `/start`, `/help` and
//! `/play`. Everything else is ignored.

mod command;
mod telegram;

pub use command::{
    BotCommand, BotReply, PLAY_BUTTON_LABEL, ParseMode, WebAppButton, escape_html, mention_html,
};
pub use telegram::{
    BotError, Chat, ChatTransport, Message, TelegramClient, Update, User, send_message_body,
};

use crate::config::BotConfig;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Pause after a failed poll before trying again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Polls a transport and answers commands.
#[derive(Debug)]
pub struct Dispatcher<T> {
    transport: T,
    web_app_url: String,
    offset: i64,
}

impl<T: ChatTransport> Dispatcher<T> {
    /// Creates a dispatcher whose Play buttons open `web_app_url`.
    pub fn new(transport: T, web_app_url: impl Into<String>) -> Self {
        Self {
            transport,
            web_app_url: web_app_url.into(),
            offset: 0,
        }
    }

    /// Next update id to request.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Answers a single update.
    ///
    /// Returns the command that was answered, or `None` when the update
    /// carries no recognised command.
    #[instrument(skip(self, update), fields(update_id = update.update_id))]
    pub async fn handle_update(&self, update: &Update) -> Result<Option<BotCommand>, BotError> {
        let Some(message) = &update.message else {
            return Ok(None);
        };
        let Some(command) = message.text.as_deref().and_then(BotCommand::parse) else {
            debug!("Ignoring non-command message");
            return Ok(None);
        };

        info!(%command, chat_id = message.chat.id, "Handling command");
        let reply = command.reply(message.from.as_ref(), &self.web_app_url);
        self.transport.send_reply(message.chat.id, &reply).await?;
        Ok(Some(command))
    }

    /// Fetches one batch of updates and answers them.
    ///
    /// The offset moves past every fetched update, including ones whose
    /// reply failed. Returns the number of commands answered.
    pub async fn poll_once(&mut self) -> Result<usize, BotError> {
        let updates = self.transport.get_updates(self.offset).await?;
        let mut answered = 0;
        for update in &updates {
            self.offset = self.offset.max(update.update_id + 1);
            match self.handle_update(update).await {
                Ok(Some(_)) => answered += 1,
                Ok(None) => {}
                Err(e) => {
                    warn!(update_id = update.update_id, error = %e, "Failed to answer update")
                }
            }
        }
        Ok(answered)
    }

    /// Polls until `shutdown` resolves.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);
        info!("Bot is running...");

        'poll: loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break 'poll,
                result = self.poll_once() => {
                    if let Err(e) = result {
                        error!(error = %e, retry_in = ?RETRY_DELAY, "Polling failed");
                        tokio::select! {
                            biased;
                            _ = &mut shutdown => break 'poll,
                            _ = tokio::time::sleep(RETRY_DELAY) => {}
                        }
                    }
                }
            }
        }

        info!("Bot stopped");
    }
}

/// Runs the Telegram bot described by `config` until `shutdown` resolves.
///
/// Without a token the bot logs an error and returns immediately.
pub async fn run_bot(config: &BotConfig, shutdown: impl Future<Output = ()>) {
    let Some(token) = config.token().as_deref() else {
        error!("BOT_TOKEN not found in environment variables");
        return;
    };

    info!(web_app_url = %config.web_app_url(), "Starting bot...");
    let client = TelegramClient::new(token, Duration::from_secs(*config.poll_timeout_secs()));
    Dispatcher::new(client, config.web_app_url().clone())
        .run(shutdown)
        .await;
}
