//! Tic-tac-toe game engine.
//!
//! Pure game logic for two players sharing one board, plus an injectable
//! store that owns every game for the lifetime of the process.
//!
//! # Example
//!
//! ```
//! use miniapp_tictactoe::{Engine, MemoryStore, Outcome, Player};
//!
//! # fn main() -> Result<(), miniapp_tictactoe::EngineError> {
//! let engine = Engine::new(MemoryStore::new());
//! let game = engine.create_game()?;
//!
//! let moves = [
//!     (0, Player::X),
//!     (1, Player::O),
//!     (4, Player::X),
//!     (2, Player::O),
//!     (8, Player::X),
//! ];
//! let mut last = None;
//! for (position, player) in moves {
//!     last = Some(engine.apply_move(game.key(), position, player)?);
//! }
//!
//! let outcome = last.unwrap();
//! assert_eq!(*outcome.game().winner(), Some(Outcome::Won(Player::X)));
//! assert_eq!(outcome.message(), "Player X wins!");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod engine;
mod error;
mod game;
mod key;
mod rules;
mod store;
mod types;

pub use engine::{CREATE_ATTEMPTS, Engine, FETCH_MESSAGE, MoveOutcome, NEW_GAME_MESSAGE};
pub use error::{EngineError, ErrorKind};
pub use game::Game;
pub use key::GameKey;
pub use rules::{LINES, check_winner, evaluate};
pub use store::{GameStore, MemoryStore};
pub use types::{BOARD_SIZE, Board, Cell, GameStatus, Outcome, Player};
