//! Game session management.
//!
//! Each browser session owns one [`GameSession`]: a game, the players'
//! names and their running scores. Sessions are keyed by id and never share
//! mutable state; the store lock is held for the whole of one operation.

use derive_getters::Getters;
use derive_more::{Display, Error};
use power4_engine::{
    BoardSize, Coordinate, Game, GameStatus, Gravity, GravityRule, MoveError, Player,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Unique identifier for a game session.
pub type SessionId = Uuid;

/// Default display name for player 1.
pub const DEFAULT_PLAYER1: &str = "Player 1";
/// Default display name for player 2.
pub const DEFAULT_PLAYER2: &str = "Player 2";

/// Which rule set a session plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Fixed 6x7 board, fixed gravity, default names.
    #[default]
    Classic,
    /// Configurable board, nicknames, gravity flips every fifth move.
    Bonus,
}

impl Variant {
    /// Gravity schedule for this variant.
    pub fn gravity_rule(self) -> GravityRule {
        match self {
            Variant::Classic => GravityRule::Fixed,
            Variant::Bonus => GravityRule::bonus(),
        }
    }
}

/// Settings a session is started with.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MatchSettings {
    variant: Variant,
    size: BoardSize,
    player1: String,
    player2: String,
}

impl MatchSettings {
    /// Settings for the classic game.
    pub fn classic() -> Self {
        Self {
            variant: Variant::Classic,
            size: BoardSize::CLASSIC,
            player1: DEFAULT_PLAYER1.to_string(),
            player2: DEFAULT_PLAYER2.to_string(),
        }
    }

    /// Builds settings from loosely-typed start-game input.
    ///
    /// The classic variant ignores size and names. The bonus variant clamps
    /// the size and falls back to default names for blank ones.
    #[instrument]
    pub fn from_input(
        variant: Variant,
        rows: Option<i64>,
        columns: Option<i64>,
        player1: Option<String>,
        player2: Option<String>,
    ) -> Self {
        match variant {
            Variant::Classic => Self::classic(),
            Variant::Bonus => Self {
                variant,
                size: BoardSize::clamped(rows, columns),
                player1: name_or_default(player1, DEFAULT_PLAYER1),
                player2: name_or_default(player2, DEFAULT_PLAYER2),
            },
        }
    }

    /// Display name of the given player.
    pub fn name_of(&self, player: Player) -> &str {
        match player {
            Player::Blue => &self.player1,
            Player::Red => &self.player2,
        }
    }
}

fn name_or_default(name: Option<String>, default: &str) -> String {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Cumulative wins per player across games of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scores {
    /// Wins for player 1 (Blue).
    pub player1: u32,
    /// Wins for player 2 (Red).
    pub player2: u32,
}

impl Scores {
    /// Credits one win to `winner`.
    pub fn record_win(&mut self, winner: Player) {
        match winner {
            Player::Blue => self.player1 += 1,
            Player::Red => self.player2 += 1,
        }
    }

    /// Zeroes both counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A game session: one live game plus names and scores.
#[derive(Debug, Clone, Getters)]
pub struct GameSession {
    id: SessionId,
    settings: MatchSettings,
    game: Game,
    scores: Scores,
    #[getter(skip)]
    last_touched: Instant,
}

impl GameSession {
    /// Creates a new game session.
    #[instrument(skip(settings), fields(variant = ?settings.variant))]
    pub fn new(id: SessionId, settings: MatchSettings) -> Self {
        info!(session_id = %id, "Creating new game session");
        let game = Game::new(settings.size, settings.variant.gravity_rule());
        Self {
            id,
            settings,
            game,
            scores: Scores::default(),
            last_touched: Instant::now(),
        }
    }

    /// Plays the current player's piece into `column`.
    ///
    /// When the move ends the game with a winner, the winner's score is
    /// credited here, once.
    ///
    /// # Errors
    ///
    /// Returns the reason the move was refused; the game is untouched.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn play(&mut self, column: usize) -> Result<Coordinate, MoveError> {
        self.game.check_move(column).inspect_err(|e| {
            warn!(column, error = %e, "Move rejected");
        })?;

        let landed = self.game.make_move(column).ok_or(MoveError::ColumnFull(column))?;

        if let Some(winner) = self.game.winner() {
            self.scores.record_win(winner);
            info!(winner = %winner, scores = ?self.scores, "Game won, score recorded");
        }

        debug!(%landed, status = %self.game.status(), "Move completed successfully");
        Ok(landed)
    }

    /// Starts a new game on the same board; names and scores are kept.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn new_game(&mut self) {
        self.game.reset();
        info!("New game started");
    }

    /// Restarts the session with new settings; scores are cleared.
    #[instrument(skip(self, settings), fields(session_id = %self.id))]
    pub fn restart(&mut self, settings: MatchSettings) {
        *self = Self::new(self.id, settings);
    }

    /// Clears both scores without touching the board.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn reset_scores(&mut self) {
        self.scores.reset();
        info!("Scores reset");
    }

    /// Time since the session was last read or played.
    pub fn idle_for(&self) -> Duration {
        self.last_touched.elapsed()
    }

    /// Display name of the player to move.
    pub fn current_name(&self) -> &str {
        self.settings.name_of(self.game.current_player())
    }

    /// Announcement for a finished game, `None` while in progress.
    pub fn result_message(&self) -> Option<String> {
        match self.game.status() {
            GameStatus::InProgress => None,
            GameStatus::Draw => Some("It's a draw!".to_string()),
            GameStatus::Won(winner) => Some(match self.settings.variant {
                Variant::Classic => format!(
                    "{} ({}) wins!",
                    self.settings.name_of(winner),
                    winner
                ),
                Variant::Bonus => format!("{} wins!", self.settings.name_of(winner)),
            }),
        }
    }

    /// Warning shown while pieces fill from the top.
    pub fn gravity_notice(&self) -> Option<&'static str> {
        (self.game.gravity() == Gravity::Inverted && !self.game.is_over())
            .then_some("Inverse Gravity Active! Pieces fall from bottom to top!")
    }
}

/// User-facing text for a refused move.
pub fn rejection_message(error: &MoveError) -> &'static str {
    match error {
        MoveError::GameOver => "Game is already over!",
        MoveError::ColumnFull(_) => "Column is full! Try another column.",
        MoveError::ColumnOutOfRange { .. } => "That column does not exist.",
    }
}

/// Failure looking up or creating a session.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// No session with this id.
    #[display("Session {} not found", _0)]
    NotFound(#[error(not(source))] SessionId),

    /// The store already holds the maximum number of sessions.
    #[display("Session limit of {} reached", _0)]
    LimitReached(#[error(not(source))] usize),

    /// A previous holder of the lock panicked.
    #[display("Session store lock poisoned")]
    Poisoned,
}

/// Manages all game sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, GameSession>>>,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl SessionManager {
    /// Creates a session manager holding at most `max_sessions` sessions.
    ///
    /// Sessions untouched for `idle_timeout` are reclaimed when the store is
    /// full.
    #[instrument]
    pub fn new(max_sessions: usize, idle_timeout: Duration) -> Self {
        info!("Creating session manager");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            max_sessions,
            idle_timeout,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, GameSession>>, SessionError> {
        self.sessions.lock().map_err(|_| {
            warn!("Session store lock poisoned");
            SessionError::Poisoned
        })
    }

    /// Creates a new session and returns a copy of it.
    #[instrument(skip(self, settings))]
    pub fn create(&self, settings: MatchSettings) -> Result<GameSession, SessionError> {
        let mut sessions = self.lock()?;

        if sessions.len() >= self.max_sessions {
            let before = sessions.len();
            sessions.retain(|_, session| session.idle_for() < self.idle_timeout);
            info!(evicted = before - sessions.len(), "Evicted idle sessions");
        }

        if sessions.len() >= self.max_sessions {
            warn!(limit = self.max_sessions, "Refusing new session");
            return Err(SessionError::LimitReached(self.max_sessions));
        }

        let id = Uuid::new_v4();
        let session = GameSession::new(id, settings);
        sessions.insert(id, session.clone());

        info!(session_id = %id, count = sessions.len(), "Created new session");
        Ok(session)
    }

    /// Runs `f` against the session while holding the store lock.
    #[instrument(skip(self, f))]
    pub fn with_session<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut GameSession) -> R,
    ) -> Result<R, SessionError> {
        let mut sessions = self.lock()?;
        let session = sessions.get_mut(&id).ok_or_else(|| {
            debug!(session_id = %id, "Session not found");
            SessionError::NotFound(id)
        })?;
        session.last_touched = Instant::now();
        Ok(f(session))
    }

    /// Gets a copy of a session.
    pub fn get(&self, id: SessionId) -> Result<GameSession, SessionError> {
        self.with_session(id, |session| session.clone())
    }

    /// Ends a session.
    #[instrument(skip(self))]
    pub fn remove(&self, id: SessionId) -> Result<(), SessionError> {
        let mut sessions = self.lock()?;
        if sessions.remove(&id).is_none() {
            debug!(session_id = %id, "Session not found");
            return Err(SessionError::NotFound(id));
        }
        info!(session_id = %id, count = sessions.len(), "Session ended");
        Ok(())
    }

    /// Number of live sessions.
    pub fn len(&self) -> Result<usize, SessionError> {
        Ok(self.lock()?.len())
    }
}
