//! Draw detection.

use super::super::{Board, Coordinate, Gravity};
use tracing::instrument;

/// Checks if every cell of the board is occupied.
///
/// A full board with no winner is a draw.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.occupied() == board.size().cells()
}

/// Checks if every cell of the entry row for `gravity` is occupied.
///
/// Matches [`is_full`] only while every column was filled from one edge.
/// Once gravity has flipped, a column can still have room in the middle
/// while both edge rows are taken.
#[instrument(skip(board))]
pub fn is_entry_row_full(board: &Board, gravity: Gravity) -> bool {
    let row = board.entry_row(gravity);
    (0..board.columns()).all(|column| !board.is_empty(Coordinate::new(row, column)))
}
