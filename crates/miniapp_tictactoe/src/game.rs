//! A single game and its move rules.

use crate::error::EngineError;
use crate::key::GameKey;
use crate::rules;
use crate::types::{BOARD_SIZE, Board, Cell, GameStatus, Outcome, Player};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One tic-tac-toe game.
///
/// Fields are only mutated through [`Game::play`], which keeps the
/// following invariants (checked by [`Game::validate`]):
/// - `winner.is_some()` exactly when `game_over` is set, and `game_over`
///   never reverts;
/// - occupied cells never become empty again;
/// - X moves first, so the X count minus the O count is always 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(try_from = "GameRecord")]
pub struct Game {
    /// Unique key of this game.
    key: GameKey,
    /// Current board.
    board: Board,
    /// Player expected to move next (the last mover once the game is over).
    current_player: Player,
    /// Terminal result, `None` while in progress.
    winner: Option<Outcome>,
    /// Set once the game reaches a terminal state.
    game_over: bool,
    /// Creation time, for diagnostics.
    created_at: DateTime<Utc>,
}

/// Unchecked wire form of a [`Game`].
#[derive(Deserialize)]
struct GameRecord {
    key: GameKey,
    board: Board,
    current_player: Player,
    winner: Option<Outcome>,
    game_over: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<GameRecord> for Game {
    type Error = EngineError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        let game = Game {
            key: record.key,
            board: record.board,
            current_player: record.current_player,
            winner: record.winner,
            game_over: record.game_over,
            created_at: record.created_at,
        };
        game.validate()?;
        Ok(game)
    }
}

impl Game {
    /// Creates a new game with an empty board and X to move.
    #[instrument]
    pub fn new(key: GameKey) -> Self {
        Self {
            key,
            board: Board::new(),
            current_player: Player::X,
            winner: None,
            game_over: false,
            created_at: Utc::now(),
        }
    }

    /// Lifecycle state derived from the winner.
    pub fn status(&self) -> GameStatus {
        self.winner.into()
    }

    /// Human-readable description of the next turn or the final result.
    pub fn status_message(&self) -> String {
        match self.winner {
            None => format!("Player {}'s turn", self.current_player),
            Some(Outcome::Won(player)) => format!("Player {} wins!", player),
            Some(Outcome::Tie) => "It's a tie!".to_string(),
        }
    }

    /// Checks that this game is one [`Game::play`] could have produced.
    pub fn validate(&self) -> Result<(), EngineError> {
        let x = self.board.count(Player::X);
        let o = self.board.count(Player::O);
        if x != o && x != o + 1 {
            return Err(EngineError::Inconsistent("mark counts out of turn order"));
        }
        if self.game_over != self.winner.is_some() {
            return Err(EngineError::Inconsistent("game_over does not match the winner"));
        }
        if self.winner != rules::evaluate(&self.board) {
            return Err(EngineError::Inconsistent("winner does not match the board"));
        }
        // A finished game keeps its last mover as current player.
        let expected = match (self.game_over, x > o) {
            (false, false) | (true, true) => Player::X,
            (false, true) | (true, false) => Player::O,
        };
        if self.current_player != expected {
            return Err(EngineError::Inconsistent("current player out of turn order"));
        }
        Ok(())
    }

    /// Checks that `next` may replace this game.
    ///
    /// `next` must be valid, keep the key, keep every occupied cell, and
    /// leave a finished game exactly as it is.
    pub fn check_successor(&self, next: &Game) -> Result<(), EngineError> {
        if self.key != next.key {
            return Err(EngineError::Inconsistent("game key changed"));
        }
        next.validate()?;
        let cells_kept = self
            .board
            .cells()
            .iter()
            .zip(next.board.cells())
            .all(|(before, after)| *before == Cell::Empty || before == after);
        if !cells_kept {
            return Err(EngineError::Inconsistent("occupied cell changed"));
        }
        if self.game_over && next != self {
            return Err(EngineError::Inconsistent("finished game changed"));
        }
        Ok(())
    }

    /// Validates and applies a move.
    ///
    /// Checks run in order and the first failure wins: finished game,
    /// position out of range, occupied cell, wrong player. A failed
    /// move leaves the game untouched.
    #[instrument(skip(self), fields(game_id = %self.key))]
    pub fn play(&mut self, position: i64, player: Player) -> Result<Option<Outcome>, EngineError> {
        if self.game_over {
            return Err(EngineError::GameFinished);
        }

        let index = usize::try_from(position)
            .ok()
            .filter(|&i| i < BOARD_SIZE)
            .ok_or(EngineError::PositionOutOfRange(position))?;

        if self.board.get(index) != Some(Cell::Empty) {
            return Err(EngineError::CellOccupied(index));
        }

        if player != self.current_player {
            return Err(EngineError::NotYourTurn {
                expected: self.current_player,
                actual: player,
            });
        }

        self.board.claim(index, player);

        match rules::evaluate(&self.board) {
            Some(outcome) => {
                debug!(?outcome, "Game reached a terminal state");
                self.winner = Some(outcome);
                self.game_over = true;
            }
            None => {
                self.current_player = player.opponent();
            }
        }

        Ok(self.winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOP_ROW_WIN: [(i64, Player); 5] = [
        (0, Player::X),
        (3, Player::O),
        (1, Player::X),
        (4, Player::O),
        (2, Player::X),
    ];

    fn game() -> Game {
        Game::new(GameKey::from("game_test"))
    }

    fn play_all(g: &mut Game, moves: &[(i64, Player)]) {
        for &(pos, player) in moves {
            g.play(pos, player).unwrap();
        }
    }

    #[test]
    fn test_new_game_is_empty() {
        let g = game();
        assert_eq!(g.board(), &Board::new());
        assert_eq!(*g.current_player(), Player::X);
        assert_eq!(*g.winner(), None);
        assert!(!g.game_over());
        assert_eq!(g.status(), GameStatus::InProgress);
        assert!(g.board().cells().iter().all(|c| *c == Cell::Empty));
    }

    #[test]
    fn test_status_message_names_next_player() {
        let mut g = game();
        assert_eq!(g.status_message(), "Player X's turn");
        g.play(4, Player::X).unwrap();
        assert_eq!(g.status_message(), "Player O's turn");
    }

    #[test]
    fn test_finished_check_precedes_range_check() {
        let mut g = game();
        play_all(&mut g, &TOP_ROW_WIN);
        assert!(*g.game_over());
        assert_eq!(g.play(42, Player::O), Err(EngineError::GameFinished));
    }

    #[test]
    fn test_range_check_precedes_turn_check() {
        let mut g = game();
        assert_eq!(g.play(-1, Player::O), Err(EngineError::PositionOutOfRange(-1)));
        assert_eq!(g.play(9, Player::O), Err(EngineError::PositionOutOfRange(9)));
    }

    #[test]
    fn test_occupied_check_precedes_turn_check() {
        let mut g = game();
        g.play(0, Player::X).unwrap();
        // X is out of turn and the cell is taken: occupancy is reported.
        assert_eq!(g.play(0, Player::X), Err(EngineError::CellOccupied(0)));
    }

    #[test]
    fn test_failed_move_does_not_mutate() {
        let mut g = game();
        g.play(0, Player::X).unwrap();
        let before = g.clone();
        assert!(g.play(0, Player::O).is_err());
        assert!(g.play(5, Player::X).is_err());
        assert_eq!(g, before);
    }

    #[test]
    fn test_status_after_win() {
        let mut g = game();
        play_all(&mut g, &TOP_ROW_WIN);
        assert_eq!(g.status(), GameStatus::Won(Player::X));
        assert_eq!(g.status_message(), "Player X wins!");
    }

    #[test]
    fn test_played_games_validate() {
        let mut g = game();
        assert_eq!(g.validate(), Ok(()));
        for &(pos, player) in &TOP_ROW_WIN {
            g.play(pos, player).unwrap();
            assert_eq!(g.validate(), Ok(()));
        }
    }

    #[test]
    fn test_deserialize_roundtrip_keeps_game() {
        let mut g = game();
        play_all(&mut g, &TOP_ROW_WIN);
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(serde_json::from_str::<Game>(&json).unwrap(), g);
    }

    #[test]
    fn test_deserialize_rejects_game_over_without_winner() {
        let mut value = serde_json::to_value(game()).unwrap();
        value["game_over"] = serde_json::json!(true);
        value["winner"] = serde_json::Value::Null;

        let err = serde_json::from_value::<Game>(value).unwrap_err();
        assert!(err.to_string().contains("game_over does not match the winner"));
    }

    #[test]
    fn test_deserialize_rejects_unearned_winner() {
        let mut value = serde_json::to_value(game()).unwrap();
        value["game_over"] = serde_json::json!(true);
        value["winner"] = serde_json::to_value(Outcome::Won(Player::O)).unwrap();

        let err = serde_json::from_value::<Game>(value).unwrap_err();
        assert!(err.to_string().contains("winner does not match the board"));
    }

    #[test]
    fn test_successor_must_move_forward() {
        let before = game();
        let mut after = before.clone();
        play_all(&mut after, &TOP_ROW_WIN);

        assert_eq!(before.check_successor(&after), Ok(()));
        assert_eq!(
            after.check_successor(&before),
            Err(EngineError::Inconsistent("occupied cell changed"))
        );
        assert_eq!(
            before.check_successor(&Game::new(GameKey::from("game_other"))),
            Err(EngineError::Inconsistent("game key changed"))
        );
    }

    #[test]
    fn test_finished_game_has_no_successor() {
        let mut tie = game();
        play_all(
            &mut tie,
            &[
                (0, Player::X),
                (1, Player::O),
                (2, Player::X),
                (4, Player::O),
                (3, Player::X),
                (5, Player::O),
                (7, Player::X),
                (6, Player::O),
                (8, Player::X),
            ],
        );
        assert_eq!(tie.check_successor(&tie.clone()), Ok(()));

        let mut other = game();
        play_all(&mut other, &TOP_ROW_WIN);
        assert!(tie.check_successor(&other).is_err());
    }
}
