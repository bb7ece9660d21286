//! Power4 - Connect-4 served over HTTP.
//!
//! # Architecture
//!
//! - **Engine**: board, move rules and win/draw detection live in
//!   [`power4_engine`]
//! - **Session**: one game plus names and scores per browser session
//! - **Server**: axum routes serving the page and a JSON API
//!
//! # Example
//!
//! ```no_run
//! use power4::{ServerConfig, serve};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::load(None)?;
//! serve(&config).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod config;
mod error;
mod server;
mod session;

pub use api::{GameSnapshot, MoveRequest, MoveResponse, StartGameRequest, StatusView};
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorBody};
pub use server::{AppState, router, serve};
pub use session::{
    DEFAULT_PLAYER1, DEFAULT_PLAYER2, GameSession, MatchSettings, Scores, SessionError, SessionId,
    SessionManager, Variant, rejection_message,
};
