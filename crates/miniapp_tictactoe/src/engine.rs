//! Engine entry points used by the presentation adapters.

use crate::error::EngineError;
use crate::game::Game;
use crate::key::GameKey;
use crate::store::{GameStore, MemoryStore};
use crate::types::Player;
use derive_getters::{Dissolve, Getters};
use tracing::{info, instrument, warn};

/// Status message for a freshly created game.
pub const NEW_GAME_MESSAGE: &str = "New game created!";

/// Status message for a plain state lookup.
pub const FETCH_MESSAGE: &str = "Game state retrieved";

/// Keys tried by [`Engine::create_game`] before a collision is reported.
pub const CREATE_ATTEMPTS: usize = 3;

/// Result of a successful move: the updated game and a status line.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Dissolve, derive_new::new)]
pub struct MoveOutcome {
    /// Game after the move.
    game: Game,
    /// Next player's turn or the final result.
    message: String,
}

/// Tic-tac-toe engine over an injected game store.
#[derive(Debug, Clone, Default)]
pub struct Engine<S = MemoryStore> {
    store: S,
}

impl<S: GameStore> Engine<S> {
    /// Creates an engine backed by `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates and stores a new game.
    ///
    /// A key collision is retried with a fresh key, up to
    /// [`CREATE_ATTEMPTS`] keys in total; the last collision and any other
    /// store failure are returned.
    #[instrument(skip(self))]
    pub fn create_game(&self) -> Result<Game, EngineError> {
        let mut attempt = 1;
        loop {
            let game = Game::new(GameKey::generate());
            match self.store.create(game.clone()) {
                Ok(()) => {
                    info!(game_id = %game.key(), "Created new game");
                    return Ok(game);
                }
                Err(EngineError::DuplicateKey(key)) if attempt < CREATE_ATTEMPTS => {
                    warn!(game_id = %key, attempt, "Generated key collided, retrying");
                    attempt += 1;
                }
                Err(e) => {
                    warn!(error = %e, attempt, "Could not store new game");
                    return Err(e);
                }
            }
        }
    }

    /// Fetches a snapshot of a game.
    #[instrument(skip(self), fields(game_id = %key))]
    pub fn get_game(&self, key: &GameKey) -> Result<Game, EngineError> {
        self.store
            .get(key)
            .ok_or_else(|| EngineError::NotFound(key.clone()))
    }

    /// Validates and applies a move atomically.
    ///
    /// Fails with `NotFound` for an unknown key, then with the first
    /// failing move check (see [`Game::play`]).
    #[instrument(skip(self), fields(game_id = %key))]
    pub fn apply_move(
        &self,
        key: &GameKey,
        position: i64,
        player: Player,
    ) -> Result<MoveOutcome, EngineError> {
        let result = self.store.update(key, |game| {
            game.play(position, player)?;
            Ok(MoveOutcome::new(game.clone(), game.status_message()))
        });

        match &result {
            Ok(outcome) => info!(
                position,
                %player,
                status = ?outcome.game().status(),
                "Move applied"
            ),
            Err(e) => warn!(position, %player, kind = %e.kind(), error = %e, "Move rejected"),
        }

        result
    }
}
