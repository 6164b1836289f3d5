//! Request and response bodies for the web API.

use miniapp_tictactoe::{Game, GameKey, Player};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Game to play in.
    pub game_id: GameKey,
    /// Cell index, 0-8 in row-major order.
    pub position: i64,
    /// Mover's symbol, `"X"` or `"O"`.
    pub player: Player,
}

/// Game state as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResponse {
    /// Game key.
    pub game_id: String,
    /// Nine cells: `"X"`, `"O"` or `""`.
    pub board: Vec<String>,
    /// `"X"` or `"O"`.
    pub current_player: String,
    /// `"X"`, `"O"`, `"Tie"`, or null while in progress.
    pub winner: Option<String>,
    /// Whether the game has ended.
    pub game_over: bool,
    /// Status line for display.
    pub message: String,
}

impl GameResponse {
    /// Renders a game with the given status line.
    pub fn new(game: &Game, message: impl Into<String>) -> Self {
        Self {
            game_id: game.key().to_string(),
            board: game.board().symbols(),
            current_player: game.current_player().symbol().to_string(),
            winner: game.winner().map(|o| o.symbol().to_string()),
            game_over: *game.game_over(),
            message: message.into(),
        }
    }
}

/// Plain message body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// The message.
    pub message: String,
}

/// Health check body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Number of games held in memory.
    pub games: usize,
}

/// Error body, `{"detail": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub detail: String,
}
