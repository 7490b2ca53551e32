//! Integration tests for authentication flow.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new().await;

    let registered = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": "marguerite",
                "email": "marguerite@example.com",
                "password": PASSWORD,
            })),
            None,
        )
        .await;
    assert_eq!(registered.status, StatusCode::CREATED, "{:?}", registered.body);
    assert_eq!(registered.data()["role"], "customer");
    assert!(registered.data().get("password_hash").is_none());

    let token = app.login("marguerite").await;
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["username"], "marguerite");
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new().await;
    app.customer_token("testuser").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "testuser", "password": "wrong-password" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_weak_password_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "username": "weakling", "password": "password" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let app = TestApp::new().await;
    app.customer_token("taken").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "username": "Taken", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_refresh_issues_new_tokens() {
    let app = TestApp::new().await;
    app.customer_token("refresher").await;

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "refresher", "password": PASSWORD })),
            None,
        )
        .await;
    let refresh_token = login.data()["refresh_token"].as_str().expect("token");
    let access_token = login.data()["access_token"].as_str().expect("token");

    let refreshed = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": refresh_token })),
            None,
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    assert!(refreshed.data()["access_token"].is_string());

    let misuse = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": access_token })),
            None,
        )
        .await;
    assert_eq!(misuse.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "AUTHENTICATION");
}
