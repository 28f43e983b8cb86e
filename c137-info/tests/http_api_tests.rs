//! HTTP API integration tests
//!
//! Drive the router with `oneshot` over test doubles for the character API,
//! the wiki and the completion endpoint.

mod helpers;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use c137_info::build_router;
use helpers::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn no_about() -> PathBuf {
    PathBuf::from("/nonexistent/about-content.yaml")
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post(app: axum::Router, uri: &str, body: Value) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Decode every `data:` frame of an SSE body
fn sse_events(body: &str) -> Vec<Value> {
    body.split("\n\n")
        .filter_map(|frame| {
            frame
                .lines()
                .find_map(|line| line.strip_prefix("data:"))
                .map(|data| serde_json::from_str(data.trim()).unwrap())
        })
        .collect()
}

#[tokio::test]
async fn test_health_reports_module_and_mode() {
    let app = build_router(app_state(RoutedTransport::new(), offline_pipeline(), no_about()));

    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "c137-info");
    assert_eq!(body["dev_mode"], true);
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_random_character_remaps_dead_status() {
    let transport = RoutedTransport::new()
        .route("/character", 200, page_json(826))
        .route("/character/42", 200, record_json(42, "Birdperson", "Dead"));
    let app = build_router(app_state(transport, offline_pipeline(), no_about()));

    let (status, body) = get_json(app, "/api/random-character").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 42);
    assert_eq!(body["status"], "Deceased");
}

#[tokio::test]
async fn test_random_character_other_statuses_pass_through() {
    let transport = RoutedTransport::new()
        .route("/character", 200, page_json(826))
        .route("/character/42", 200, record_json(42, "Squanchy", "unknown"));
    let app = build_router(app_state(transport, offline_pipeline(), no_about()));

    let (_, body) = get_json(app, "/api/random-character").await;
    assert_eq!(body["status"], "unknown");
}

#[tokio::test]
async fn test_random_character_uses_fallback_cast() {
    // Count fails; first fallback id is missing, second one answers
    let transport = RoutedTransport::new()
        .route("/character", 500, String::new())
        .route("/character/2", 200, record_json(2, "Morty Smith", "Alive"));
    let calls = transport.calls.clone();
    let app = build_router(app_state(transport, offline_pipeline(), no_about()));

    let (status, body) = get_json(app, "/api/random-character").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Morty Smith");
    let calls = calls.lock().unwrap();
    assert!(!calls.iter().any(|c| c == "/character/3"));
}

#[tokio::test]
async fn test_random_character_static_fallback_when_upstream_down() {
    let app = build_router(app_state(RoutedTransport::down(), offline_pipeline(), no_about()));

    let (status, body) = get_json(app, "/api/random-character").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Rick Sanchez");
    assert_eq!(body["origin"]["name"], "Earth (C-137)");
}

#[tokio::test]
async fn test_character_by_id_and_missing_id() {
    let transport =
        RoutedTransport::new().route("/character/7", 200, record_json(7, "Abradolf Lincler", "Dead"));
    let state = app_state(transport, offline_pipeline(), no_about());

    let (status, body) = get_json(build_router(state.clone()), "/api/characters/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 7);
    // Only the random endpoint remaps status
    assert_eq!(body["status"], "Dead");

    let (status, body) = get_json(build_router(state), "/api/characters/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_count_and_upstream_failure() {
    let transport = RoutedTransport::new().route("/character", 200, page_json(826));
    let (status, body) = get_json(
        build_router(app_state(transport, offline_pipeline(), no_about())),
        "/api/characters/count",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "count": 826 }));

    let (status, body) = get_json(
        build_router(app_state(RoutedTransport::down(), offline_pipeline(), no_about())),
        "/api/characters/count",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_page_and_search() {
    let transport = RoutedTransport::new()
        .route("/character?page=2", 200, page_json(826))
        .route("/character/?name=rick", 200, page_json(107));
    let state = app_state(transport, offline_pipeline(), no_about());

    let (status, body) = get_json(build_router(state.clone()), "/api/characters?page=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["count"], 826);

    let (status, body) =
        get_json(build_router(state.clone()), "/api/characters/search?name=rick").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["count"], 107);

    // Upstream 404 for a search means "no matches"
    let (status, body) =
        get_json(build_router(state), "/api/characters/search?name=zzzz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["count"], 0);
    assert_eq!(body["results"], json!([]));
}

#[tokio::test]
async fn test_placeholder_character() {
    let app = build_router(app_state(RoutedTransport::new(), offline_pipeline(), no_about()));

    let (status, body) = get_json(app, "/api/placeholder-character").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 0);
    assert_eq!(body["name"], "Loading...");
}

#[tokio::test]
async fn test_stream_in_dev_mode_completes_with_name() {
    let app = build_router(app_state(RoutedTransport::new(), offline_pipeline(), no_about()));

    let response = post(
        app,
        "/api/character-info-stream",
        json!({ "characterName": "Rick Sanchez" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let events = sse_events(&String::from_utf8(bytes.to_vec()).unwrap());

    assert_eq!(events.len(), 4);
    assert!(events[..3].iter().all(|e| e["type"] == "log" && e["timestamp"].is_string()));
    let last = &events[3];
    assert_eq!(last["type"], "complete");
    assert!(last["data"]["info"].as_str().unwrap().contains("Rick_Sanchez"));
}

#[tokio::test]
async fn test_stream_missing_api_key_ends_with_error() {
    let pipeline = online_pipeline(true, None);
    let app = build_router(app_state(RoutedTransport::new(), pipeline, no_about()));

    let response = post(
        app,
        "/api/character-info-stream",
        json!({ "characterName": "Morty Smith" }),
    )
    .await;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let events = sse_events(&String::from_utf8(bytes.to_vec()).unwrap());

    assert_eq!(events.first().unwrap()["message"], "> TARGET_URL: https://wiki.test/wiki/Morty Smith");
    assert_eq!(
        events.last().unwrap(),
        &json!({
            "type": "error",
            "message": "The robot is not properly configured. The API key is missing!"
        })
    );
    assert_eq!(events.iter().filter(|e| e["type"] != "log").count(), 1);
}

#[tokio::test]
async fn test_stream_full_run_over_doubles() {
    let completion = Arc::new(CannedCompletion::ok("╔═══╗ ENTITY REPORT"));
    let pipeline = online_pipeline(true, Some(completion.clone()));
    let app = build_router(app_state(RoutedTransport::new(), pipeline, no_about()));

    let response = post(
        app,
        "/api/character-info-stream",
        json!({ "characterName": "Rick Sanchez" }),
    )
    .await;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let events = sse_events(&String::from_utf8(bytes.to_vec()).unwrap());

    assert_eq!(
        events.last().unwrap(),
        &json!({ "type": "complete", "data": { "info": "╔═══╗ ENTITY REPORT" } })
    );
    let messages: Vec<&str> = events
        .iter()
        .filter_map(|e| e["message"].as_str())
        .collect();
    assert!(messages.contains(&"> CLOSING_BROWSER: Cleanup complete"));
    assert!(messages.contains(&"> STATUS: Mission successful"));
    assert_eq!(completion.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stream_rejects_blank_name() {
    let app = build_router(app_state(RoutedTransport::new(), offline_pipeline(), no_about()));

    let response = post(app, "/api/character-info-stream", json!({ "characterName": "  " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_character_info_one_shot() {
    let completion = Arc::new(CannedCompletion::ok("report"));
    let app = build_router(app_state(
        RoutedTransport::new(),
        online_pipeline(true, Some(completion)),
        no_about(),
    ));
    let response = post(app, "/api/character-info", json!({ "characterName": "Rick Sanchez" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value =
        serde_json::from_slice(&response.into_body().collect().await.unwrap().to_bytes()).unwrap();
    assert_eq!(body, json!({ "info": "report" }));

    let completion = Arc::new(CannedCompletion::ok("report"));
    let app = build_router(app_state(
        RoutedTransport::new(),
        online_pipeline(false, Some(completion)),
        no_about(),
    ));
    let response = post(app, "/api/character-info", json!({ "characterName": "Nobody" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value =
        serde_json::from_slice(&response.into_body().collect().await.unwrap().to_bytes()).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Could not find that entity"));
}

#[tokio::test]
async fn test_dynamic_errors_fallback_without_llm() {
    let app = build_router(app_state(RoutedTransport::new(), offline_pipeline(), no_about()));

    let response = post(app, "/api/dynamic-errors", json!({ "prompt": "404 page" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value =
        serde_json::from_slice(&response.into_body().collect().await.unwrap().to_bytes()).unwrap();
    assert_eq!(
        body["content"],
        "Error generating error message. The universe is experiencing technical difficulties."
    );
}

#[tokio::test]
async fn test_dynamic_errors_uses_llm_and_falls_back_on_failure() {
    let completion = Arc::new(CannedCompletion::ok("<p>Wubba lubba 404!</p>"));
    let state = app_state(RoutedTransport::new(), offline_pipeline(), no_about())
        .with_error_messages(Some(completion.clone()));
    let response = post(build_router(state), "/api/dynamic-errors", json!({})).await;
    let body: Value =
        serde_json::from_slice(&response.into_body().collect().await.unwrap().to_bytes()).unwrap();
    assert_eq!(body["content"], "<p>Wubba lubba 404!</p>");
    assert_eq!(
        completion.requests.lock().unwrap()[0].1,
        "Generate a random funny error message"
    );

    let state = app_state(RoutedTransport::new(), offline_pipeline(), no_about())
        .with_error_messages(Some(Arc::new(CannedCompletion::failing("rate limited"))));
    let response = post(build_router(state), "/api/dynamic-errors", json!({ "prompt": "x" })).await;
    let body: Value =
        serde_json::from_slice(&response.into_body().collect().await.unwrap().to_bytes()).unwrap();
    assert!(body["content"]
        .as_str()
        .unwrap()
        .starts_with("Error generating error message."));
}

#[tokio::test]
async fn test_about_placeholder_and_file() {
    let (status, body) = get_json(
        build_router(app_state(RoutedTransport::new(), offline_pipeline(), no_about())),
        "/api/about",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["introduction"]
        .as_str()
        .unwrap()
        .starts_with("**CONTENT FILE MISSING**"));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("about-content.yaml");
    std::fs::write(
        &path,
        "introduction: Hello\nacademic: a\nprofessional: p\nmusical: m\nfamily: f\n\
         beliefs:\n  intro: i\n  values: [v]\n  additional: []\nclosing: bye\nquick_info: [q]\n",
    )
    .unwrap();
    let (_, body) = get_json(
        build_router(app_state(RoutedTransport::new(), offline_pipeline(), path)),
        "/api/about",
    )
    .await;
    assert_eq!(body["introduction"], "Hello");
    assert_eq!(body["beliefs"]["values"], json!(["v"]));
}

#[tokio::test]
async fn test_weird_word() {
    let app = build_router(app_state(RoutedTransport::new(), offline_pipeline(), no_about()));

    let (status, body) = get_json(app, "/api/weird-word").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["word"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_random_name_and_identity() {
    let state = app_state(RoutedTransport::new(), offline_pipeline(), no_about());

    let (status, body) = get_json(
        build_router(state.clone()),
        "/api/random-name?adjective=celestial&noun=star",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let name = body["name"].as_str().unwrap();
    let (adjective, noun) = name.split_once(' ').unwrap();
    assert!(["astral", "cosmic", "stellar", "galactic", "lunar"].contains(&adjective));
    assert!(["sun", "polaris", "sirius", "betelgeuse", "vega"].contains(&noun));

    let (_, body) = get_json(build_router(state), "/api/identity").await;
    assert_eq!(body, json!({ "name": "Rick Sanchez", "first_name": "Rick" }));
}
