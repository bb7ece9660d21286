//! Moves and their failure modes.

use serde::{Deserialize, Serialize};

/// A cell on the board: the requested column plus the row resolved by gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Row index, 0 is the top row.
    pub row: usize,
    /// Column index, 0 is the left-most column.
    pub column: usize,
}

impl Coordinate {
    /// Creates a coordinate.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(row {}, column {})", self.row, self.column)
    }
}

/// Reason a move cannot be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The game already has a winner or ended in a draw.
    #[display("Game is already over")]
    GameOver,

    /// The column does not exist on this board.
    #[display("Column {} out of range (board has {} columns)", column, columns)]
    ColumnOutOfRange {
        /// Requested column.
        column: usize,
        /// Columns on the board.
        columns: usize,
    },

    /// Every cell of the column is occupied.
    #[display("Column {} is full", _0)]
    ColumnFull(usize),
}

impl std::error::Error for MoveError {}
