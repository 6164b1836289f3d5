//! Win and tie detection.
//!
//! Pure functions over a [`Board`]. The scan order of [`LINES`] is fixed so
//! that evaluation is deterministic: rows top to bottom, columns left to
//! right, then the two diagonals.

use crate::types::{Board, Cell, Outcome, Player};
use tracing::instrument;

/// The eight triples checked for a win, in scan order.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the player owning the first completed line, if any.
pub fn check_winner(board: &Board) -> Option<Player> {
    LINES.iter().find_map(|&[a, b, c]| match board.get(a) {
        Some(Cell::Occupied(player))
            if board.get(b) == Some(Cell::Occupied(player))
                && board.get(c) == Some(Cell::Occupied(player)) =>
        {
            Some(player)
        }
        _ => None,
    })
}

/// Evaluates a board.
///
/// Returns `Some(Outcome::Won(p))` for the first completed line,
/// `Some(Outcome::Tie)` when the board is full with no completed line,
/// and `None` while the game can continue.
#[instrument(level = "trace", skip(board))]
pub fn evaluate(board: &Board) -> Option<Outcome> {
    if let Some(player) = check_winner(board) {
        return Some(Outcome::Won(player));
    }
    if board.is_full() {
        return Some(Outcome::Tie);
    }
    None
}
