//! Chat commands and the replies they produce.

use super::telegram::User;
use derive_getters::Getters;
use std::str::FromStr;

/// Label of the button that opens the game.
pub const PLAY_BUTTON_LABEL: &str = "🎮 Play Tic-Tac-Toe";

/// Commands understood by the bot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BotCommand {
    /// Greets the user and offers the game.
    Start,
    /// Lists commands and rules.
    Help,
    /// Offers the game without the greeting.
    Play,
}

impl BotCommand {
    /// Parses a command from message text.
    ///
    /// Accepts `/name`, `/name@botname` and trailing arguments; returns
    /// `None` for plain text or unknown commands.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split_once('@').map_or(name, |(name, _)| name);
        Self::from_str(name).ok()
    }

    /// Short description for command menus.
    pub fn description(self) -> &'static str {
        match self {
            BotCommand::Start => "Start the bot and play the game",
            BotCommand::Help => "Show this help message",
            BotCommand::Play => "Open the game directly",
        }
    }

    /// Builds the reply for this command.
    pub fn reply(self, user: Option<&User>, web_app_url: &str) -> BotReply {
        let button = Some(WebAppButton::new(PLAY_BUTTON_LABEL, web_app_url));
        match self {
            BotCommand::Start => BotReply {
                text: welcome_text(user),
                parse_mode: Some(ParseMode::Html),
                web_app_button: button,
            },
            BotCommand::Help => BotReply {
                text: help_text(),
                parse_mode: Some(ParseMode::Html),
                web_app_button: None,
            },
            BotCommand::Play => BotReply {
                text: "🎮 Ready to play Tic-Tac-Toe?".to_string(),
                parse_mode: None,
                web_app_button: button,
            },
        }
    }
}

/// Text formatting of a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Telegram HTML subset.
    Html,
}

impl ParseMode {
    /// Name expected by the `parse_mode` field.
    pub fn as_str(self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
        }
    }
}

/// Inline keyboard button that opens a web app.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct WebAppButton {
    /// Button caption.
    #[new(into)]
    label: String,
    /// Page opened inside the chat client.
    #[new(into)]
    url: String,
}

/// A message the bot sends back.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct BotReply {
    /// Message body.
    text: String,
    /// Formatting, plain text when `None`.
    parse_mode: Option<ParseMode>,
    /// Optional button opening the game.
    web_app_button: Option<WebAppButton>,
}

/// Escapes text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Clickable HTML mention of a user.
pub fn mention_html(user: &User) -> String {
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        user.id,
        escape_html(&user.full_name())
    )
}

fn welcome_text(user: Option<&User>) -> String {
    let who = user.map_or_else(|| "there".to_string(), mention_html);
    format!(
        "🎉 Welcome to Tic-Tac-Toe, {}!\n\n\
         Ready to play the classic game right here in Telegram?\n\n\
         Click the button below to start playing:",
        who
    )
}

fn help_text() -> String {
    use strum::IntoEnumIterator;

    let commands: String = BotCommand::iter()
        .map(|c| format!("• /{} - {}\n", c, c.description()))
        .collect();

    format!(
        "🎮 <b>Tic-Tac-Toe Bot Help</b>\n\n\
         <b>Commands:</b>\n{}\n\
         <b>How to Play:</b>\n\
         1. Click the \"Play Tic-Tac-Toe\" button\n\
         2. The game will open in a mini app\n\
         3. Player X always goes first\n\
         4. Click on empty squares to make your move\n\
         5. Get 3 in a row to win!\n\n\
         <b>Features:</b>\n\
         • Real-time gameplay\n\
         • New game anytime\n\
         • Works seamlessly in Telegram\n\n\
         Have fun playing! 🎯",
        commands
    )
}
