//! Game storage.
//!
//! The engine never touches a global table; it is handed a [`GameStore`].
//! [`MemoryStore`] keeps every game in process memory for the lifetime of
//! the process.

use crate::error::EngineError;
use crate::game::Game;
use crate::key::GameKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, instrument, warn};

/// Keyed storage for games.
///
/// Implementations must make [`GameStore::update`] atomic per key:
/// two updates against the same key never interleave. Updates against
/// different keys must not block each other.
pub trait GameStore: Send + Sync {
    /// Inserts a new game. Fails with [`EngineError::DuplicateKey`] when
    /// the key is already taken.
    fn create(&self, game: Game) -> Result<(), EngineError>;

    /// Returns a snapshot of the game stored under `key`.
    fn get(&self, key: &GameKey) -> Option<Game>;

    /// Replaces the game stored under its key.
    ///
    /// The replacement must be a forward continuation of the stored game
    /// (see [`Game::check_successor`]); otherwise the store is unchanged
    /// and [`EngineError::Inconsistent`] is returned.
    fn put(&self, game: Game) -> Result<(), EngineError>;

    /// Runs `f` against the stored game while holding its lock.
    fn update<T, F>(&self, key: &GameKey, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut Game) -> Result<T, EngineError>;

    /// Number of stored games.
    fn len(&self) -> usize;

    /// Returns true if no games are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory game table with one lock per game.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    games: Arc<RwLock<HashMap<GameKey, Arc<Mutex<Game>>>>>,
}

/// Moves are validated before any field changes, so a lock poisoned by a
/// panicking caller still guards a consistent game.
fn recover<G>(err: PoisonError<G>) -> G {
    warn!("Recovering poisoned game store lock");
    err.into_inner()
}

fn lock(slot: &Mutex<Game>) -> MutexGuard<'_, Game> {
    slot.lock().unwrap_or_else(recover)
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        debug!("Creating in-memory game store");
        Self::default()
    }

    fn slot(&self, key: &GameKey) -> Option<Arc<Mutex<Game>>> {
        let games = self.games.read().unwrap_or_else(recover);
        games.get(key).cloned()
    }
}

impl GameStore for MemoryStore {
    #[instrument(skip(self, game), fields(game_id = %game.key()))]
    fn create(&self, game: Game) -> Result<(), EngineError> {
        let mut games = self.games.write().unwrap_or_else(recover);
        if games.contains_key(game.key()) {
            warn!("Game key already in use");
            return Err(EngineError::DuplicateKey(game.key().clone()));
        }
        games.insert(game.key().clone(), Arc::new(Mutex::new(game)));
        debug!(count = games.len(), "Stored new game");
        Ok(())
    }

    #[instrument(skip(self))]
    fn get(&self, key: &GameKey) -> Option<Game> {
        let game = self.slot(key).map(|slot| lock(&slot).clone());
        if game.is_none() {
            debug!("Game not found");
        }
        game
    }

    #[instrument(skip(self, game), fields(game_id = %game.key()))]
    fn put(&self, game: Game) -> Result<(), EngineError> {
        let slot = self
            .slot(game.key())
            .ok_or_else(|| EngineError::NotFound(game.key().clone()))?;
        let mut stored = lock(&slot);
        if let Err(e) = stored.check_successor(&game) {
            warn!(error = %e, "Rejected game replacement");
            return Err(e);
        }
        *stored = game;
        Ok(())
    }

    fn update<T, F>(&self, key: &GameKey, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut Game) -> Result<T, EngineError>,
    {
        // Table lock is released before the game lock is taken.
        let slot = self
            .slot(key)
            .ok_or_else(|| EngineError::NotFound(key.clone()))?;
        let mut game = lock(&slot);
        f(&mut *game)
    }

    fn len(&self) -> usize {
        self.games.read().unwrap_or_else(recover).len()
    }
}
