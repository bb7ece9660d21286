//! HTTP-facing error type.

use crate::session::SessionError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error, From};
use serde::Serialize;
use tracing::{error, warn};

/// Error returned by API handlers.
///
/// Illegal-but-well-formed moves are not errors; they come back as a
/// refused move with a reason. This type covers malformed input, unknown
/// sessions, and internal failures.
#[derive(Debug, Display, Error, From)]
pub enum ApiError {
    /// The request body or a parameter could not be understood.
    #[display("Bad request: {}", _0)]
    #[from(skip)]
    BadRequest(#[error(not(source))] String),

    /// The requested column is not on this board.
    #[display("Column {} out of range (board has {} columns)", column, columns)]
    #[from(skip)]
    ColumnOutOfRange {
        /// Requested column.
        column: i64,
        /// Columns on the board.
        columns: usize,
    },

    /// Session lookup or creation failed.
    #[display("{}", _0)]
    Session(SessionError),
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable description.
    pub error: String,
}

impl ApiError {
    /// Status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ColumnOutOfRange { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::LimitReached(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Session(SessionError::Poisoned) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, %status, "Request failed");
        } else {
            warn!(error = %self, %status, "Request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
