//! Pure Connect-4 game logic.
//!
//! The engine owns the board, the player to move, the terminal status and the
//! gravity direction. It knows nothing about HTTP, sessions or rendering.
//!
//! # Example
//!
//! ```
//! use power4_engine::{Game, GameStatus, Player};
//!
//! let mut game = Game::classic();
//! for column in [0, 1, 0, 1, 0, 1, 0] {
//!     game.make_move(column);
//! }
//! assert_eq!(game.status(), GameStatus::Won(Player::Blue));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod game;
pub mod rules;
mod types;

pub use action::{Coordinate, MoveError};
pub use board::Board;
pub use game::Game;
pub use types::{BoardSize, Cell, GameStatus, Gravity, GravityRule, Player, SizeError};
