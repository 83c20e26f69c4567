//! Integration tests for login, logout and token handling

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::util::ServiceExt;

use common::{auth_request, extract_json, json_request, setup_app};
use toolhub_common::config::AdminCredentials;
use toolhub_common::db::users;

async fn seed_admin(db: &sqlx::SqlitePool) {
    let admin = AdminCredentials {
        username: "admin".to_string(),
        password: "s3cret".to_string(),
    };
    assert!(users::ensure_admin(db, &admin).await.unwrap());
    // Second call finds the existing account
    assert!(!users::ensure_admin(db, &admin).await.unwrap());
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = setup_app().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/auth/login", None, &json!({"username": "admin"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = setup_app().await;
    seed_admin(&app.db).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"username": "admin", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_token_grants_staff_access_until_logout() {
    let app = setup_app().await;
    seed_admin(&app.db).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"username": "admin", "password": "s3cret"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["user"]["is_staff"], true);
    let token = body["access"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    let author = json!({"name": "Nino", "slug": "nino"});
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/authors", Some(&token), &author))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .router
        .clone()
        .oneshot(auth_request("POST", "/api/auth/logout", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Revoked token no longer authenticates
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/authors", Some(&token), &author))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = setup_app().await;
    let guid = users::create_user(&app.db, "editor", "", "pw", true).await.unwrap();
    let (token, _) = users::create_session(&app.db, &guid, 0).await.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(auth_request("DELETE", "/api/tools/1", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_token() {
    let app = setup_app().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/auth/logout", None, &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
