//! Shared helpers for toolhub-api integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::path::PathBuf;
use tempfile::TempDir;
use toolhub_api::{build_router, AppState};
use toolhub_common::config::ServiceConfig;
use toolhub_common::db::{init_database, users};

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub root: PathBuf,
    /// Keeps the root folder alive for the duration of the test
    _dir: TempDir,
}

pub fn test_config(root: PathBuf) -> ServiceConfig {
    ServiceConfig {
        root_folder: root,
        bind_address: "127.0.0.1".to_string(),
        port: 0,
        public_base_url: None,
        media_url: "/media/".to_string(),
        page_size: 2,
        token_ttl_hours: 1,
        admin: None,
        cors_allowed_origins: Vec::new(),
        log_level: "debug".to_string(),
    }
}

/// Test helper: fresh database in a temporary root folder
pub async fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path().to_path_buf();
    std::fs::create_dir_all(root.join("media")).expect("media dir");

    let db = init_database(&root.join("toolhub.db")).await.expect("database");
    let state = AppState::new(db.clone(), test_config(root.clone()));

    TestApp {
        router: build_router(state),
        db,
        root,
        _dir: dir,
    }
}

/// Create a user and return a valid access token for it
pub async fn token_for(db: &SqlitePool, username: &str, is_staff: bool) -> String {
    let guid = users::create_user(db, username, "", "password", is_staff)
        .await
        .expect("create user");
    let (token, _) = users::create_session(db, &guid, 1).await.expect("session");
    token
}

/// Test helper: request without body
pub fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "localhost:5740")
        .body(Body::empty())
        .unwrap()
}

/// Test helper: JSON request, optionally authenticated
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "localhost:5740")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Test helper: authenticated request without body
pub fn auth_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "localhost:5740")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
