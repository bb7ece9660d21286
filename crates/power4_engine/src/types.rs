//! Core domain types for Connect-4.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Player in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Player {
    /// Player 1 (moves first).
    Blue,
    /// Player 2.
    Red,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Blue => Player::Red,
            Player::Red => Player::Blue,
        }
    }

    /// One-based seat number (Blue = 1, Red = 2).
    pub fn number(self) -> u8 {
        match self {
            Player::Blue => 1,
            Player::Red => 2,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing dropped here yet.
    #[default]
    Empty,
    /// Cell holding a player's piece.
    Occupied(Player),
}

impl Cell {
    /// Returns true if no piece occupies this cell.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Returns the owner of this cell, if any.
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    /// Compact numeric code: 0 empty, 1 Blue, 2 Red.
    pub fn code(self) -> u8 {
        self.owner().map_or(0, Player::number)
    }
}

/// Direction pieces travel when dropped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gravity {
    /// Pieces settle at the bottom; the top row is the entry row.
    #[default]
    Normal,
    /// Pieces settle at the top; the bottom row is the entry row.
    Inverted,
}

impl Gravity {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Gravity::Normal => Gravity::Inverted,
            Gravity::Inverted => Gravity::Normal,
        }
    }
}

/// When, if ever, gravity changes direction during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GravityRule {
    /// Gravity never changes.
    #[default]
    Fixed,
    /// Gravity toggles after every n-th accepted move.
    FlipEvery(usize),
}

impl GravityRule {
    /// Flip period used by the bonus variant.
    pub const BONUS_PERIOD: usize = 5;

    /// The rule played in the bonus variant.
    pub fn bonus() -> Self {
        GravityRule::FlipEvery(Self::BONUS_PERIOD)
    }

    /// Returns true if gravity should toggle once `turns` moves have been accepted.
    pub fn flips_after(self, turns: usize) -> bool {
        match self {
            GravityRule::Fixed => false,
            GravityRule::FlipEvery(0) => false,
            GravityRule::FlipEvery(period) => turns > 0 && turns % period == 0,
        }
    }
}

/// Board size outside the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Board size {}x{} out of range (each side must be 4-15)", rows, columns)]
pub struct SizeError {
    /// Requested rows.
    pub rows: usize,
    /// Requested columns.
    pub columns: usize,
}

/// Dimensions of a board, fixed for the lifetime of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    rows: usize,
    columns: usize,
}

impl BoardSize {
    /// Smallest allowed side.
    pub const MIN: usize = 4;
    /// Largest allowed side.
    pub const MAX: usize = 15;
    /// Standard 6x7 board.
    pub const CLASSIC: BoardSize = BoardSize {
        rows: 6,
        columns: 7,
    };

    /// Creates a size, rejecting sides outside `MIN..=MAX`.
    #[instrument]
    pub fn new(rows: usize, columns: usize) -> Result<Self, SizeError> {
        let range = Self::MIN..=Self::MAX;
        if range.contains(&rows) && range.contains(&columns) {
            Ok(Self { rows, columns })
        } else {
            Err(SizeError { rows, columns })
        }
    }

    /// Creates a size from loosely-typed input.
    ///
    /// Missing sides fall back to the classic 6x7 dimensions; numeric values
    /// are clamped into `MIN..=MAX`.
    #[instrument]
    pub fn clamped(rows: Option<i64>, columns: Option<i64>) -> Self {
        let clamp = |value: Option<i64>, default: usize| {
            value.map_or(default, |v| v.clamp(Self::MIN as i64, Self::MAX as i64) as usize)
        };
        Self {
            rows: clamp(rows, Self::CLASSIC.rows),
            columns: clamp(columns, Self::CLASSIC.columns),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells.
    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Returns true unless the game is still in progress.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }

    /// Returns the winner, if any.
    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::Won(player) => Some(player),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "Ongoing"),
            GameStatus::Won(player) => write!(f, "{} Wins", player),
            GameStatus::Draw => write!(f, "Draw"),
        }
    }
}
