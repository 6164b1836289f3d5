//! Engine error types.

use crate::key::GameKey;
use crate::types::Player;
use derive_more::{Display, Error};

/// Broad failure category, used by adapters to pick a transport status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ErrorKind {
    /// The referenced game does not exist.
    NotFound,
    /// The request is structurally invalid.
    InvalidArgument,
    /// The request is well-formed but breaks the rules of the game.
    InvalidState,
}

/// Error returned by engine and store operations.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    /// No game is stored under the key.
    #[display("game not found: {_0}")]
    NotFound(#[error(not(source))] GameKey),

    /// The game has already reached a terminal state.
    #[display("game already finished")]
    GameFinished,

    /// Position outside `0..=8`.
    #[display("position out of range")]
    PositionOutOfRange(#[error(not(source))] i64),

    /// The target cell already holds a mark.
    #[display("cell occupied")]
    CellOccupied(#[error(not(source))] usize),

    /// The mover is not the current player.
    #[display("not this player's turn")]
    NotYourTurn {
        /// Player whose turn it is.
        expected: Player,
        /// Player that tried to move.
        actual: Player,
    },

    /// A game record breaks the rules a played game always satisfies.
    #[display("inconsistent game state: {_0}")]
    Inconsistent(#[error(not(source))] &'static str),

    /// The store already holds a game under this key.
    #[display("game key already in use: {_0}")]
    DuplicateKey(#[error(not(source))] GameKey),
}

impl EngineError {
    /// Returns the failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::PositionOutOfRange(_) => ErrorKind::InvalidArgument,
            EngineError::GameFinished
            | EngineError::CellOccupied(_)
            | EngineError::NotYourTurn { .. }
            | EngineError::Inconsistent(_)
            | EngineError::DuplicateKey(_) => ErrorKind::InvalidState,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let key = GameKey::from("game_missing");
        assert_eq!(EngineError::NotFound(key).kind(), ErrorKind::NotFound);
        assert_eq!(
            EngineError::PositionOutOfRange(9).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(EngineError::CellOccupied(4).kind(), ErrorKind::InvalidState);
        assert_eq!(
            EngineError::Inconsistent("finished game reopened").kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            EngineError::NotYourTurn {
                expected: Player::X,
                actual: Player::O
            }
            .kind(),
            ErrorKind::InvalidState
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(EngineError::GameFinished.to_string(), "game already finished");
        assert_eq!(
            EngineError::PositionOutOfRange(-1).to_string(),
            "position out of range"
        );
        assert_eq!(EngineError::CellOccupied(0).to_string(), "cell occupied");
        assert_eq!(
            EngineError::NotFound(GameKey::from("game_x")).to_string(),
            "game not found: game_x"
        );
    }
}
