//! Route handlers. Each one translates a request into one engine call.

use super::AppState;
use super::error::ApiError;
use super::types::{GameResponse, HealthResponse, MessageResponse, MoveRequest};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Html;
use miniapp_tictactoe::{FETCH_MESSAGE, GameKey, GameStore, NEW_GAME_MESSAGE};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Embedded browser client.
const GAME_PAGE: &str = include_str!("../../assets/game.html");

/// API banner.
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Telegram Tic-Tac-Toe Mini App API".to_string(),
    })
}

/// Health check with the number of games in memory.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        games: state.engine.store().len(),
    })
}

/// Creates a new game.
#[instrument(skip(state))]
pub async fn new_game(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = state.engine.create_game()?;
    info!(game_id = %game.key(), "New game requested");
    Ok(Json(GameResponse::new(&game, NEW_GAME_MESSAGE)))
}

/// Returns the current state of a game.
#[instrument(skip(state))]
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = state.engine.get_game(&GameKey::from(game_id))?;
    debug!(status = ?game.status(), "Game state retrieved");
    Ok(Json(GameResponse::new(&game, FETCH_MESSAGE)))
}

/// Applies a move.
#[instrument(skip(state, payload))]
pub async fn make_move(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let Json(req) = payload?;
    debug!(
        game_id = %req.game_id,
        position = req.position,
        player = %req.player,
        "Processing move"
    );

    let (game, message) = state
        .engine
        .apply_move(&req.game_id, req.position, req.player)?
        .dissolve();
    Ok(Json(GameResponse::new(&game, message)))
}

/// Serves the browser client.
pub async fn game_page() -> Html<&'static str> {
    Html(GAME_PAGE)
}
