//! Request and response bodies for the JSON API.

use crate::session::{GameSession, Scores, SessionId, Variant};
use power4_engine::{GameStatus, Gravity};
use serde::{Deserialize, Serialize};

/// Body of a start-game request.
///
/// Every field is optional; missing values take the variant's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartGameRequest {
    /// Rule set to play.
    #[serde(default)]
    pub variant: Variant,
    /// Board rows (bonus only, clamped to 4-15).
    #[serde(default)]
    pub rows: Option<i64>,
    /// Board columns (bonus only, clamped to 4-15).
    #[serde(default)]
    pub columns: Option<i64>,
    /// Nickname for player 1 (bonus only).
    #[serde(default)]
    pub player1: Option<String>,
    /// Nickname for player 2 (bonus only).
    #[serde(default)]
    pub player2: Option<String>,
}

/// Body of a move request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Zero-based column to drop a piece into.
    pub column: i64,
}

/// Terminal state as seen by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusView {
    /// Game still being played.
    Ongoing,
    /// Player 1 (Blue) won.
    Player1Wins,
    /// Player 2 (Red) won.
    Player2Wins,
    /// Board filled with no winner.
    Draw,
}

impl From<GameStatus> for StatusView {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::InProgress => StatusView::Ongoing,
            GameStatus::Won(power4_engine::Player::Blue) => StatusView::Player1Wins,
            GameStatus::Won(power4_engine::Player::Red) => StatusView::Player2Wins,
            GameStatus::Draw => StatusView::Draw,
        }
    }
}

/// Everything the page needs to draw a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Session this snapshot belongs to.
    pub session_id: SessionId,
    /// Rule set being played.
    pub variant: Variant,
    /// Board rows.
    pub rows: usize,
    /// Board columns.
    pub columns: usize,
    /// Cells, top row first: 0 empty, 1 player 1, 2 player 2.
    pub board: Vec<Vec<u8>>,
    /// Seat to move: 1 or 2.
    pub current_player: u8,
    /// Display name of the player to move.
    pub current_name: String,
    /// Display names, player 1 first.
    pub player_names: [String; 2],
    /// Running scores.
    pub scores: Scores,
    /// Terminal state.
    pub status: StatusView,
    /// Winning seat, if any.
    pub winner: Option<u8>,
    /// True once won or drawn.
    pub game_over: bool,
    /// Direction the next piece falls.
    pub gravity: Gravity,
    /// Accepted moves in the current game.
    pub turn_count: usize,
}

impl From<&GameSession> for GameSnapshot {
    fn from(session: &GameSession) -> Self {
        let game = session.game();
        let settings = session.settings();
        Self {
            session_id: *session.id(),
            variant: *settings.variant(),
            rows: game.size().rows(),
            columns: game.size().columns(),
            board: game.board().to_codes(),
            current_player: game.current_player().number(),
            current_name: session.current_name().to_string(),
            player_names: [settings.player1().clone(), settings.player2().clone()],
            scores: *session.scores(),
            status: game.status().into(),
            winner: game.winner().map(|p| p.number()),
            game_over: game.is_over(),
            gravity: game.gravity(),
            turn_count: game.turns(),
        }
    }
}

/// Result of a move request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Whether the piece was placed.
    pub accepted: bool,
    /// Why the move was refused.
    pub reason: Option<String>,
    /// Status line for the page, empty when there is nothing to say.
    pub message: String,
    /// True only in the response to the move that ended the game.
    pub show_result: bool,
    /// Row the piece landed on.
    pub landed_row: Option<usize>,
    /// State after the move.
    pub snapshot: GameSnapshot,
}
