//! HTTP server: routes, handlers and request logging.

use crate::api::{GameSnapshot, MoveRequest, MoveResponse, StartGameRequest};
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::session::{MatchSettings, SessionId, SessionManager, rejection_message};
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{Html, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use derive_new::new;
use std::net::SocketAddr;
use std::time::Instant;
use tracing::{debug, info, instrument};

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared state handed to every handler.
#[derive(Debug, Clone, new)]
pub struct AppState {
    sessions: SessionManager,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/bonus", get(page))
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/{id}", get(get_session).delete(end_session))
        .route("/api/sessions/{id}/start", post(start_game))
        .route("/api/sessions/{id}/move", post(make_move))
        .route("/api/sessions/{id}/new-game", post(new_game))
        .route("/api/sessions/{id}/reset-scores", post(reset_scores))
        .with_state(state)
        .layer(middleware::from_fn(log_requests))
}

/// Binds the configured address and serves until Ctrl+C.
#[instrument(skip(config), fields(addr = %config.bind_addr()))]
pub async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let sessions = SessionManager::new(*config.max_sessions(), config.idle_timeout());
    let state = AppState::new(sessions.clone());
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Power4 server listening");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!(live_sessions = sessions.len().unwrap_or_default(), "Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Serves the single-page client; the page picks its variant from the path.
async fn page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "OK"
}

#[instrument(skip(state, body))]
async fn create_session(
    State(state): State<AppState>,
    body: Result<Json<StartGameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GameSnapshot>), ApiError> {
    let Json(request) = body.map_err(bad_request)?;
    let session = state.sessions.create(settings_from(request))?;
    Ok((StatusCode::CREATED, Json(GameSnapshot::from(&session))))
}

#[instrument(skip(state))]
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<GameSnapshot>, ApiError> {
    let session = state.sessions.get(id)?;
    Ok(Json(GameSnapshot::from(&session)))
}

#[instrument(skip(state, body))]
async fn start_game(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    body: Result<Json<StartGameRequest>, JsonRejection>,
) -> Result<Json<GameSnapshot>, ApiError> {
    let Json(request) = body.map_err(bad_request)?;
    let settings = settings_from(request);
    let snapshot = state.sessions.with_session(id, |session| {
        session.restart(settings);
        GameSnapshot::from(&*session)
    })?;
    Ok(Json(snapshot))
}

#[instrument(skip(state, body))]
async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, ApiError> {
    let Json(MoveRequest { column }) = body.map_err(bad_request)?;

    let response = state.sessions.with_session(id, |session| {
        let columns = session.game().size().columns();
        let index = usize::try_from(column)
            .ok()
            .filter(|&c| c < columns)
            .ok_or(ApiError::ColumnOutOfRange { column, columns })?;

        let response = match session.play(index) {
            Ok(landed) => {
                let over = session.game().is_over();
                let message = session
                    .result_message()
                    .or_else(|| session.gravity_notice().map(str::to_string))
                    .unwrap_or_default();
                MoveResponse {
                    accepted: true,
                    reason: None,
                    message,
                    show_result: over,
                    landed_row: Some(landed.row),
                    snapshot: GameSnapshot::from(&*session),
                }
            }
            Err(e) => {
                let reason = rejection_message(&e).to_string();
                MoveResponse {
                    accepted: false,
                    reason: Some(reason.clone()),
                    message: reason,
                    show_result: false,
                    landed_row: None,
                    snapshot: GameSnapshot::from(&*session),
                }
            }
        };
        Ok::<_, ApiError>(response)
    })??;

    debug!(accepted = response.accepted, "Move handled");
    Ok(Json(response))
}

#[instrument(skip(state))]
async fn new_game(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<GameSnapshot>, ApiError> {
    let snapshot = state.sessions.with_session(id, |session| {
        session.new_game();
        GameSnapshot::from(&*session)
    })?;
    Ok(Json(snapshot))
}

#[instrument(skip(state))]
async fn reset_scores(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<GameSnapshot>, ApiError> {
    let snapshot = state.sessions.with_session(id, |session| {
        session.reset_scores();
        GameSnapshot::from(&*session)
    })?;
    Ok(Json(snapshot))
}

#[instrument(skip(state))]
async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn settings_from(request: StartGameRequest) -> MatchSettings {
    MatchSettings::from_input(
        request.variant,
        request.rows,
        request.columns,
        request.player1,
        request.player2,
    )
}

fn bad_request(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

/// Logs one line per request: client, method, path, status and latency.
async fn log_requests(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let remote = remote_addr(&req);
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    info!(
        %remote,
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request handled"
    );
    response
}

/// Client address, preferring the first `X-Forwarded-For` hop.
fn remote_addr(req: &Request) -> String {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
