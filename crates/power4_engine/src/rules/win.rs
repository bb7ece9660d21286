//! Win detection anchored at the last placed piece.

use super::super::{Board, Cell, Coordinate};
use tracing::instrument;

/// Pieces in a row needed to win.
pub const WIN_LENGTH: usize = 4;

/// Axis directions: horizontal, vertical, diagonal, anti-diagonal.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Counts consecutive cells matching the anchor along one axis.
///
/// Walks both senses of `(dr, dc)` from `anchor`, counting the anchor itself.
/// Returns 0 when the anchor is empty or off the board.
pub fn line_length(board: &Board, anchor: Coordinate, (dr, dc): (isize, isize)) -> usize {
    let mark = match board.get(anchor) {
        Some(cell @ Cell::Occupied(_)) => cell,
        _ => return 0,
    };

    let walk = |dr: isize, dc: isize| {
        let mut count = 0;
        let mut cursor = board.offset(anchor, dr, dc);
        while let Some(coord) = cursor {
            if board.get(coord) != Some(mark) {
                break;
            }
            count += 1;
            cursor = board.offset(coord, dr, dc);
        }
        count
    };

    1 + walk(dr, dc) + walk(-dr, -dc)
}

/// Returns true if the piece at `anchor` completes a line of four or more.
#[instrument(skip(board))]
pub fn is_winning_placement(board: &Board, anchor: Coordinate) -> bool {
    AXES
        .iter()
        .any(|&axis| line_length(board, anchor, axis) >= WIN_LENGTH)
}
