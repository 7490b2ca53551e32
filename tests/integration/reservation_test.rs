//! Integration tests for reservation submission and self-service.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_second_party_conflicts_on_single_table() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[10]).await;
    let guest = app.customer_token("guest").await;

    let first = app.reserve(&guest, venue_id, "19:00", 4).await;
    assert_eq!(first.status, StatusCode::CREATED, "{:?}", first.body);
    assert_eq!(first.body["success"], json!(true));
    assert_eq!(first.data()["status"], "pending");
    assert_eq!(first.data()["party_size"], 4);
    assert!(first.data()["table_id"].is_string());

    let second = app.reserve(&guest, venue_id, "19:00", 8).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.error(), "SLOT_CONFLICT");
    assert_eq!(second.body["details"]["partySize"], 8);
}

#[tokio::test]
async fn test_time_after_closing_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;
    let guest = app.customer_token("guest").await;

    let response = app.reserve(&guest, venue_id, "23:30", 2).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "OUTSIDE_OPERATING_HOURS");
    assert_eq!(response.body["details"]["closesAt"], "23:00");
}

#[tokio::test]
async fn test_zero_party_is_missing_field() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;
    let guest = app.customer_token("guest").await;

    let response = app.reserve(&guest, venue_id, "19:00", 0).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "MISSING_FIELD");
    assert_eq!(response.body["details"]["field"], "partySize");
}

#[tokio::test]
async fn test_party_above_venue_limit() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[12]).await;
    let guest = app.customer_token("guest").await;

    let response = app.reserve(&guest, venue_id, "19:00", 11).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "PARTY_SIZE_EXCEEDED");
}

#[tokio::test]
async fn test_past_and_malformed_dates() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;
    let guest = app.customer_token("guest").await;
    let path = format!("/api/venues/{venue_id}/reservations");

    let past = app
        .request(
            "POST",
            &path,
            Some(helpers::reservation_body("2030-05-31", "19:00", 2)),
            Some(&guest),
        )
        .await;
    assert_eq!(past.status, StatusCode::BAD_REQUEST);
    assert_eq!(past.error(), "PAST_DATE");

    let malformed = app
        .request(
            "POST",
            &path,
            Some(helpers::reservation_body("next friday", "19:00", 2)),
            Some(&guest),
        )
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.error(), "INVALID_DATE");
}

#[tokio::test]
async fn test_missing_name_is_reported_by_field() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;
    let guest = app.customer_token("guest").await;

    let response = app
        .request(
            "POST",
            &format!("/api/venues/{venue_id}/reservations"),
            Some(json!({
                "email": "ada@example.com",
                "phone": "555-0100",
                "date": helpers::tomorrow(),
                "time": "19:00",
                "partySize": 2,
            })),
            Some(&guest),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "MISSING_FIELD");
    assert_eq!(response.body["details"]["field"], "customerName");
}

#[tokio::test]
async fn test_unknown_venue_is_not_found() {
    let app = TestApp::new().await;
    let guest = app.customer_token("guest").await;

    let response = app.reserve(&guest, uuid::Uuid::new_v4(), "19:00", 2).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submission_requires_token() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;

    let response = app
        .request(
            "POST",
            &format!("/api/venues/{venue_id}/reservations"),
            Some(helpers::reservation_body(&helpers::tomorrow(), "19:00", 2)),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cancel_frees_the_table() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;
    let guest = app.customer_token("guest").await;

    let first = app.reserve(&guest, venue_id, "20:00", 4).await;
    assert_eq!(first.status, StatusCode::CREATED);
    let id = first.data()["id"].as_str().expect("id").to_string();

    assert_eq!(
        app.reserve(&guest, venue_id, "20:00", 2).await.status,
        StatusCode::CONFLICT
    );

    let cancelled = app
        .request(
            "POST",
            &format!("/api/reservations/{id}/cancel"),
            None,
            Some(&guest),
        )
        .await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.data()["status"], "cancelled");

    assert_eq!(
        app.reserve(&guest, venue_id, "20:00", 2).await.status,
        StatusCode::CREATED
    );

    let again = app
        .request(
            "POST",
            &format!("/api/reservations/{id}/cancel"),
            None,
            Some(&guest),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.error(), "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_reservations_are_private_to_their_owner() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4, 6]).await;
    let alice = app.customer_token("alice").await;
    let bob = app.customer_token("bob").await;

    let created = app.reserve(&alice, venue_id, "18:30", 2).await;
    let id = created.data()["id"].as_str().expect("id").to_string();
    let path = format!("/api/reservations/{id}");

    assert_eq!(app.request("GET", &path, None, Some(&alice)).await.status, StatusCode::OK);
    assert_eq!(app.request("GET", &path, None, Some(&admin)).await.status, StatusCode::OK);
    assert_eq!(
        app.request("GET", &path, None, Some(&bob)).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.request("POST", &format!("{path}/cancel"), None, Some(&bob))
            .await
            .status,
        StatusCode::FORBIDDEN
    );

    let mine = app
        .request("GET", "/api/reservations/mine", None, Some(&bob))
        .await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.data()["total_items"], 0);

    let mine = app
        .request("GET", "/api/reservations/mine?page=1&limit=5", None, Some(&alice))
        .await;
    assert_eq!(mine.data()["total_items"], 1);
    assert_eq!(mine.data()["page_size"], 5);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;
    let guest = app.customer_token("guest").await;

    let response = app
        .request(
            "POST",
            &format!("/api/venues/{venue_id}/reservations"),
            Some(json!({ "partySize": "four" })),
            Some(&guest),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "INVALID_BODY");
}
