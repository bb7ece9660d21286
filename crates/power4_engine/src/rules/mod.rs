//! Game rules for Connect-4.
//!
//! Pure functions evaluating a board after a placement. Rules are kept apart
//! from board storage so both gravity directions share one detector.

pub mod draw;
pub mod win;

pub use draw::{is_entry_row_full, is_full};
pub use win::{AXES, WIN_LENGTH, is_winning_placement, line_length};
