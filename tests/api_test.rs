//! End-to-end tests of the HTTP API, driven through the router in memory.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use power4::{AppState, SessionManager, router};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

fn app(max_sessions: usize) -> Router {
    router(AppState::new(SessionManager::new(
        max_sessions,
        Duration::from_secs(3600),
    )))
}

/// Sends one request and returns the status with the body parsed as JSON
/// (`Null` for empty or non-JSON bodies).
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create(app: &Router, settings: Value) -> String {
    let (status, snapshot) = send(app, Method::POST, "/api/sessions", Some(settings)).await;
    assert_eq!(status, StatusCode::CREATED);
    snapshot["session_id"]
        .as_str()
        .expect("session id")
        .to_string()
}

async fn play(app: &Router, id: &str, column: i64) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        &format!("/api/sessions/{id}/move"),
        Some(json!({ "column": column })),
    )
    .await
}

async fn play_all(app: &Router, id: &str, columns: &[i64]) -> Value {
    let mut last = Value::Null;
    for &column in columns {
        let (status, outcome) = play(app, id, column).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["accepted"], true, "move into {column} refused");
        last = outcome;
    }
    last
}

#[tokio::test]
async fn test_health() {
    let app = app(4);
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_pages_served() {
    let app = app(4);
    for path in ["/", "/bonus"] {
        let response = app
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("Power4"));
    }
}

#[tokio::test]
async fn test_classic_session_defaults() {
    let app = app(4);
    let (status, snapshot) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(json!({ "variant": "classic", "rows": 10, "columns": 12, "player1": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(snapshot["variant"], "classic");
    assert_eq!(snapshot["rows"], 6);
    assert_eq!(snapshot["columns"], 7);
    assert_eq!(snapshot["player_names"], json!(["Player 1", "Player 2"]));
    assert_eq!(snapshot["current_player"], 1);
    assert_eq!(snapshot["status"], "ongoing");
    assert_eq!(snapshot["gravity"], "normal");
    assert_eq!(snapshot["turn_count"], 0);
    assert_eq!(snapshot["game_over"], false);
    assert_eq!(snapshot["board"], json!(vec![vec![0; 7]; 6]));
}

#[tokio::test]
async fn test_bonus_session_clamps_size_and_defaults_names() {
    let app = app(4);
    let (_, snapshot) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(json!({ "variant": "bonus", "rows": 20, "columns": 2, "player1": "Ada", "player2": "" })),
    )
    .await;
    assert_eq!(snapshot["rows"], 15);
    assert_eq!(snapshot["columns"], 4);
    assert_eq!(snapshot["player_names"], json!(["Ada", "Player 2"]));
}

#[tokio::test]
async fn test_vertical_win_scores_once() {
    let app = app(4);
    let id = create(&app, json!({ "variant": "classic" })).await;

    let outcome = play_all(&app, &id, &[0, 1, 0, 1, 0, 1]).await;
    assert_eq!(outcome["show_result"], false);
    assert_eq!(outcome["snapshot"]["current_player"], 1);

    let (_, outcome) = play(&app, &id, 0).await;
    assert_eq!(outcome["accepted"], true);
    assert_eq!(outcome["show_result"], true);
    assert_eq!(outcome["message"], "Player 1 (Blue) wins!");
    assert_eq!(outcome["landed_row"], 2);
    let snapshot = &outcome["snapshot"];
    assert_eq!(snapshot["status"], "player1_wins");
    assert_eq!(snapshot["winner"], 1);
    assert_eq!(snapshot["game_over"], true);
    assert_eq!(snapshot["scores"], json!({ "player1": 1, "player2": 0 }));

    let (status, outcome) = play(&app, &id, 3).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["accepted"], false);
    assert_eq!(outcome["reason"], "Game is already over!");
    assert_eq!(outcome["show_result"], false);
    assert_eq!(outcome["snapshot"]["scores"]["player1"], 1);
}

#[tokio::test]
async fn test_full_column_refused() {
    let app = app(4);
    let id = create(&app, json!({})).await;
    play_all(&app, &id, &[2, 2, 2, 2, 2, 2]).await;

    let (status, outcome) = play(&app, &id, 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["accepted"], false);
    assert_eq!(outcome["reason"], "Column is full! Try another column.");
    assert_eq!(outcome["snapshot"]["turn_count"], 6);
    assert_eq!(outcome["snapshot"]["current_player"], 1);
}

#[tokio::test]
async fn test_bad_columns_are_client_errors() {
    let app = app(4);
    let id = create(&app, json!({})).await;

    for column in [7, -1] {
        let (status, body) = play(&app, &id, column).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some());
    }

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/move"),
        Some(json!({ "column": "three" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, snapshot) = send(&app, Method::GET, &format!("/api/sessions/{id}"), None).await;
    assert_eq!(snapshot["turn_count"], 0);
}

#[tokio::test]
async fn test_bonus_gravity_flip_and_named_win() {
    let app = app(4);
    let id = create(
        &app,
        json!({ "variant": "bonus", "rows": 6, "columns": 7, "player1": "Ada", "player2": "Bo" }),
    )
    .await;

    let outcome = play_all(&app, &id, &[0, 1, 2, 3, 4]).await;
    assert_eq!(outcome["snapshot"]["gravity"], "inverted");
    assert_eq!(
        outcome["message"],
        "Inverse Gravity Active! Pieces fall from bottom to top!"
    );

    // Sixth move is Red's and hangs from the top row.
    let (_, outcome) = play(&app, &id, 5).await;
    assert_eq!(outcome["landed_row"], 0);
    assert_eq!(outcome["snapshot"]["board"][0][5], 2);

    let id = create(
        &app,
        json!({ "variant": "bonus", "player1": "Ada", "player2": "Bo" }),
    )
    .await;
    let outcome = play_all(&app, &id, &[0, 1, 0, 1, 0, 6, 5, 6, 5, 6, 0]).await;
    assert_eq!(outcome["message"], "Ada wins!");
    assert_eq!(outcome["show_result"], true);
}

#[tokio::test]
async fn test_new_game_and_reset_scores() {
    let app = app(4);
    let id = create(&app, json!({})).await;
    play_all(&app, &id, &[0, 1, 0, 1, 0, 1, 0]).await;

    let (status, snapshot) =
        send(&app, Method::POST, &format!("/api/sessions/{id}/new-game"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["status"], "ongoing");
    assert_eq!(snapshot["turn_count"], 0);
    assert_eq!(snapshot["scores"]["player1"], 1);

    play_all(&app, &id, &[3]).await;
    let (_, snapshot) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/reset-scores"),
        None,
    )
    .await;
    assert_eq!(snapshot["scores"], json!({ "player1": 0, "player2": 0 }));
    assert_eq!(snapshot["turn_count"], 1);
    assert_eq!(snapshot["board"][5][3], 1);
}

#[tokio::test]
async fn test_start_restarts_with_new_settings() {
    let app = app(4);
    let id = create(&app, json!({})).await;
    play_all(&app, &id, &[0, 1, 0, 1, 0, 1, 0]).await;

    let (status, snapshot) = send(
        &app,
        Method::POST,
        &format!("/api/sessions/{id}/start"),
        Some(json!({ "variant": "bonus", "rows": 8, "columns": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["session_id"], id.as_str());
    assert_eq!(snapshot["variant"], "bonus");
    assert_eq!(snapshot["rows"], 8);
    assert_eq!(snapshot["columns"], 9);
    assert_eq!(snapshot["scores"], json!({ "player1": 0, "player2": 0 }));
}

#[tokio::test]
async fn test_unknown_and_ended_sessions() {
    let app = app(4);
    let missing = "00000000-0000-4000-8000-000000000000";
    let (status, _) = send(&app, Method::GET, &format!("/api/sessions/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = play(&app, missing, 0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = create(&app, json!({})).await;
    let (status, _) = send(&app, Method::DELETE, &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_limit() {
    let app = app(1);
    create(&app, json!({})).await;
    let (status, body) = send(&app, Method::POST, "/api/sessions", Some(json!({}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_unsupported_method() {
    let app = app(4);
    let (status, _) = send(&app, Method::PUT, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_sessions_do_not_share_boards() {
    let app = app(4);
    let a = create(&app, json!({})).await;
    let b = create(&app, json!({})).await;
    play_all(&app, &a, &[3, 3]).await;

    let (_, snapshot) = send(&app, Method::GET, &format!("/api/sessions/{b}"), None).await;
    assert_eq!(snapshot["turn_count"], 0);
    assert_eq!(snapshot["current_player"], 1);
}
