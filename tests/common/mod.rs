#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use football_api::{build_router, db, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tower::ServiceExt;

pub const BASE_URL: &str = "http://testserver";

/// Router over a fresh in-memory database.
pub async fn test_app() -> Router {
    test_app_with_pool().await.0
}

/// Like [`test_app`], also handing back the pool behind the router.
pub async fn test_app_with_pool() -> (Router, SqlitePool) {
    // one connection, kept open, so every query sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    db::init_schema(&pool)
        .await
        .expect("Failed to create schema");

    let app = build_router(AppState::new(pool.clone(), Some(BASE_URL.to_string())));
    (app, pool)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    dispatch(app, request).await
}

/// Sends `body` verbatim under the given content type.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: &str,
    body: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .expect("Failed to build request");

    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Router failed");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response is not JSON")
    };

    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// Creates a resource and returns its id.
pub async fn create(app: &Router, uri: &str, body: Value) -> i64 {
    let (status, created) = post(app, uri, body).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", created);
    created["id"].as_i64().expect("created resource has an id")
}

pub mod test_data {
    use super::*;

    pub fn liga() -> Value {
        json!({
            "name": "Liga",
            "country": "Portugal",
            "number_of_teams": 30,
            "current_champion": "Equipa",
            "most_championships": "Equipa",
            "most_appearances": "Jogador"
        })
    }

    pub fn equipa() -> Value {
        json!({
            "name": "Equipa",
            "city": "Porto",
            "championships_won": 27,
            "coach": "Treinador",
            "number_of_players": 27
        })
    }

    pub fn jogador() -> Value {
        json!({
            "name": "Jogador",
            "age": 27,
            "position": "Atacante",
            "appearances": 200
        })
    }

    pub fn with(mut base: Value, key: &str, value: Value) -> Value {
        base[key] = value;
        base
    }
}
