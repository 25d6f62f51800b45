/// Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use favorites_server::{api, state::AppState};
use favorites_storage::LocalFavoritesStore;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Router backed by a fresh file database; keep the `TempDir` alive for the test
pub async fn create_test_app() -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", temp_dir.path().join("test.db").display());
    let store = LocalFavoritesStore::open(&url).await.unwrap();

    let app = api::router(AppState::new(Arc::new(store)));
    (app, temp_dir)
}

/// Send a request and return status plus parsed JSON body (`Null` when empty)
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// POST a favorite and return the created row
pub async fn add(app: &Router, rank: i64, title: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/api/favorites",
        Some(serde_json::json!({
            "rank": rank,
            "title": title,
            "artist": format!("Artist {title}"),
            "year": 1990,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json
}

/// Titles from `GET /api/favorites`, in returned order
pub async fn titles(app: &Router) -> Vec<String> {
    let (status, json) = send(app, "GET", "/api/favorites", None).await;
    assert_eq!(status, StatusCode::OK);
    json.as_array()
        .unwrap()
        .iter()
        .map(|f| f["title"].as_str().unwrap().to_string())
        .collect()
}
