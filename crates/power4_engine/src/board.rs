//! Grid storage for a Connect-4 board.

use super::action::Coordinate;
use super::types::{BoardSize, Cell, Gravity, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Rectangular board. Row 0 is the top row whatever the gravity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: BoardSize,
    /// Cells in row-major order.
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board.
    #[instrument]
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size.cells()],
        }
    }

    /// Board dimensions.
    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.size.rows()
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.size.columns()
    }

    fn index(&self, coord: Coordinate) -> Option<usize> {
        (coord.row < self.rows() && coord.column < self.columns())
            .then(|| coord.row * self.columns() + coord.column)
    }

    /// Gets the cell at the given coordinate, `None` when off the board.
    pub fn get(&self, coord: Coordinate) -> Option<Cell> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Sets the cell at the given coordinate.
    pub fn set(&mut self, coord: Coordinate, cell: Cell) -> Result<(), &'static str> {
        let i = self.index(coord).ok_or("Coordinate out of bounds")?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Cell at `(row, column)` offset by `(dr, dc)` steps, if still on the board.
    pub(crate) fn offset(&self, coord: Coordinate, dr: isize, dc: isize) -> Option<Coordinate> {
        let row = coord.row.checked_add_signed(dr)?;
        let column = coord.column.checked_add_signed(dc)?;
        (row < self.rows() && column < self.columns()).then_some(Coordinate::new(row, column))
    }

    /// Returns true if the column exists and has at least one empty cell.
    pub fn column_has_space(&self, column: usize) -> bool {
        column < self.columns()
            && (0..self.rows()).any(|row| self.is_empty(Coordinate::new(row, column)))
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, coord: Coordinate) -> bool {
        matches!(self.get(coord), Some(Cell::Empty))
    }

    /// Row a piece dropped into `column` comes to rest on.
    ///
    /// Scans from the far edge toward the entry row and returns the first
    /// empty cell, or `None` if the column is full or off the board.
    pub fn landing_row(&self, column: usize, gravity: Gravity) -> Option<usize> {
        if column >= self.columns() {
            return None;
        }
        let free = |row: &usize| self.is_empty(Coordinate::new(*row, column));
        match gravity {
            Gravity::Normal => (0..self.rows()).rev().find(free),
            Gravity::Inverted => (0..self.rows()).find(free),
        }
    }

    /// Row pieces enter from under the given gravity.
    pub fn entry_row(&self, gravity: Gravity) -> usize {
        match gravity {
            Gravity::Normal => 0,
            Gravity::Inverted => self.rows() - 1,
        }
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Rows of cells, top row first.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.columns())
    }

    /// Rows as numeric codes (0 empty, 1 Blue, 2 Red), top row first.
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.rows_iter()
            .map(|row| row.iter().map(|c| c.code()).collect())
            .collect()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows_iter() {
            let line: String = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => '.',
                    Cell::Occupied(Player::Blue) => 'B',
                    Cell::Occupied(Player::Red) => 'R',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
