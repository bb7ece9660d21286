//! Game engine for Connect-4.
//!
//! One engine serves both variants: the classic game uses
//! [`GravityRule::Fixed`], the bonus game flips gravity on a schedule.

use super::action::{Coordinate, MoveError};
use super::board::Board;
use super::rules;
use super::types::{BoardSize, Cell, GameStatus, Gravity, GravityRule, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Connect-4 game engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    current_player: Player,
    status: GameStatus,
    gravity: Gravity,
    rule: GravityRule,
    /// Accepted moves since the last reset.
    turns: usize,
}

impl Game {
    /// Player who moves first in every game.
    pub const FIRST_PLAYER: Player = Player::Blue;

    /// Creates a new game.
    #[instrument]
    pub fn new(size: BoardSize, rule: GravityRule) -> Self {
        Self {
            board: Board::new(size),
            current_player: Self::FIRST_PLAYER,
            status: GameStatus::InProgress,
            gravity: Gravity::Normal,
            rule,
            turns: 0,
        }
    }

    /// Creates a fixed-gravity game on the standard 6x7 board.
    pub fn classic() -> Self {
        Self::new(BoardSize::CLASSIC, GravityRule::Fixed)
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the board dimensions.
    pub fn size(&self) -> BoardSize {
        self.board.size()
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true once the game is won or drawn.
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        self.status.winner()
    }

    /// Returns the gravity applied to the next move.
    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    /// Returns the gravity schedule.
    pub fn rule(&self) -> GravityRule {
        self.rule
    }

    /// Returns the number of accepted moves since the last reset.
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Checks whether a move into `column` would be accepted.
    ///
    /// # Errors
    ///
    /// Returns the first reason the move is illegal: the game is over, the
    /// column does not exist, or the column has no empty cell.
    #[instrument(skip(self), fields(status = %self.status))]
    pub fn check_move(&self, column: usize) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let columns = self.board.columns();
        if column >= columns {
            return Err(MoveError::ColumnOutOfRange { column, columns });
        }
        if !self.board.column_has_space(column) {
            return Err(MoveError::ColumnFull(column));
        }
        Ok(())
    }

    /// Returns true if a move into `column` would be accepted.
    pub fn is_valid_move(&self, column: usize) -> bool {
        self.check_move(column).is_ok()
    }

    /// Drops the current player's piece into `column`.
    ///
    /// Does nothing and returns `None` if the move is invalid; callers that
    /// need the reason use [`Game::check_move`] first. On success returns the
    /// cell the piece landed on.
    #[instrument(skip(self), fields(player = %self.current_player, gravity = %self.gravity))]
    pub fn make_move(&mut self, column: usize) -> Option<Coordinate> {
        if let Err(error) = self.check_move(column) {
            debug!(%error, "Ignoring invalid move");
            return None;
        }

        let row = self.board.landing_row(column, self.gravity)?;
        let landed = Coordinate::new(row, column);
        let player = self.current_player;
        self.board.set(landed, Cell::Occupied(player)).ok()?;

        self.update_status(landed);
        if self.status == GameStatus::InProgress {
            self.current_player = player.opponent();
        }

        self.turns += 1;
        if self.status == GameStatus::InProgress && self.rule.flips_after(self.turns) {
            self.gravity = self.gravity.flipped();
            info!(turns = self.turns, gravity = %self.gravity, "Gravity flipped");
        }

        debug!(%landed, status = %self.status, "Move applied");
        Some(landed)
    }

    /// Updates game status after a placement at `landed`.
    fn update_status(&mut self, landed: Coordinate) {
        if rules::is_winning_placement(&self.board, landed) {
            self.status = GameStatus::Won(self.current_player);
            info!(winner = %self.current_player, "Game won");
        } else if rules::is_full(&self.board) {
            self.status = GameStatus::Draw;
            info!("Game drawn");
        }
    }

    /// Clears the board for a new game with the same size and gravity rule.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new(self.size(), self.rule);
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_gravity_entry_rows_full_is_not_a_draw() {
        // 4x4 bonus game: five normal moves fill the bottom row and start the
        // second, then inverted moves fill the top row.
        let mut game = Game::new(BoardSize::new(4, 4).unwrap(), GravityRule::bonus());
        for column in [0, 1, 2, 3, 0] {
            assert!(game.make_move(column).is_some());
        }
        assert_eq!(game.gravity(), Gravity::Inverted);
        for column in [1, 2, 3, 0] {
            assert!(game.make_move(column).is_some());
        }
        assert!(rules::is_entry_row_full(game.board(), Gravity::Inverted));
        assert!(rules::is_entry_row_full(game.board(), Gravity::Normal));
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(game.is_valid_move(1));
    }

    #[test]
    fn test_turn_counter_stops_on_rejected_move() {
        let mut game = Game::classic();
        game.make_move(3);
        assert_eq!(game.make_move(42), None);
        assert_eq!(game.turns(), 1);
    }
}
