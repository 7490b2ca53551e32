//! Integration tests for the administrative endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = TestApp::new().await;
    let guest = app.customer_token("guest").await;

    let anonymous = app.request("GET", "/api/admin/reservations", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let customer = app
        .request("GET", "/api/admin/reservations", None, Some(&guest))
        .await;
    assert_eq!(customer.status, StatusCode::FORBIDDEN);

    let garbage = app
        .request("GET", "/api/admin/reservations", None, Some("not-a-jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_approve_then_terminal_states_are_final() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;
    let guest = app.customer_token("guest").await;

    let created = app.reserve(&guest, venue_id, "19:00", 2).await;
    let id = created.data()["id"].as_str().expect("id").to_string();
    let path = format!("/api/admin/reservations/{id}/status");

    let approved = app
        .request("PUT", &path, Some(json!({ "status": "confirmed" })), Some(&admin))
        .await;
    assert_eq!(approved.status, StatusCode::OK, "{:?}", approved.body);
    assert_eq!(approved.data()["status"], "approved");

    let rejected = app
        .request("PUT", &path, Some(json!({ "status": "rejected" })), Some(&admin))
        .await;
    assert_eq!(rejected.status, StatusCode::CONFLICT);
    assert_eq!(rejected.error(), "INVALID_TRANSITION");

    let cancelled = app
        .request("PUT", &path, Some(json!({ "status": "cancelled" })), Some(&admin))
        .await;
    assert_eq!(cancelled.status, StatusCode::OK);

    for status in ["approved", "rejected", "cancelled"] {
        let response = app
            .request("PUT", &path, Some(json!({ "status": status })), Some(&admin))
            .await;
        assert_eq!(response.status, StatusCode::CONFLICT, "to {status}");
    }
}

#[tokio::test]
async fn test_pending_is_not_a_target_status() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;
    let guest = app.customer_token("guest").await;

    let created = app.reserve(&guest, venue_id, "19:00", 2).await;
    let id = created.data()["id"].as_str().expect("id").to_string();

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/reservations/{id}/status"),
            Some(json!({ "status": "pending" })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .request(
            "PUT",
            &format!("/api/admin/reservations/{id}/status"),
            Some(json!({ "status": "archived" })),
            Some(&admin),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rejection_releases_capacity() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[6]).await;
    let guest = app.customer_token("guest").await;

    let created = app.reserve(&guest, venue_id, "12:00", 6).await;
    let id = created.data()["id"].as_str().expect("id").to_string();
    assert_eq!(
        app.reserve(&guest, venue_id, "12:00", 2).await.status,
        StatusCode::CONFLICT
    );

    let rejected = app
        .request(
            "PUT",
            &format!("/api/admin/reservations/{id}/status"),
            Some(json!({ "status": "rejected" })),
            Some(&admin),
        )
        .await;
    assert_eq!(rejected.status, StatusCode::OK);

    assert_eq!(
        app.reserve(&guest, venue_id, "12:00", 2).await.status,
        StatusCode::CREATED
    );
}

#[tokio::test]
async fn test_list_filter_and_stats() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[2, 4, 6]).await;
    let guest = app.customer_token("guest").await;

    let mut ids = Vec::new();
    for time in ["18:00", "19:00", "20:00"] {
        let created = app.reserve(&guest, venue_id, time, 2).await;
        assert_eq!(created.status, StatusCode::CREATED);
        ids.push(created.data()["id"].as_str().expect("id").to_string());
    }
    app.request(
        "PUT",
        &format!("/api/admin/reservations/{}/status", ids[0]),
        Some(json!({ "status": "approved" })),
        Some(&admin),
    )
    .await;

    let all = app
        .request(
            "GET",
            &format!("/api/admin/reservations?venue_id={venue_id}&limit=2"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.data()["total_items"], 3);
    assert_eq!(all.data()["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(all.data()["has_next"], true);

    let pending = app
        .request(
            "GET",
            "/api/admin/reservations?status=pending",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(pending.data()["total_items"], 2);

    let stats = app
        .request(
            "GET",
            &format!("/api/admin/reservations/stats?venue_id={venue_id}"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.data()["pending"], 2);
    assert_eq!(stats.data()["approved"], 1);
    assert_eq!(stats.data()["total"], 3);
}

#[tokio::test]
async fn test_inverted_date_range_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let response = app
        .request(
            "GET",
            "/api/admin/reservations?from=2030-07-01&to=2030-06-01",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_reservation() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;
    let guest = app.customer_token("guest").await;

    let created = app.reserve(&guest, venue_id, "19:00", 2).await;
    let id = created.data()["id"].as_str().expect("id").to_string();
    let path = format!("/api/admin/reservations/{id}");

    let deleted = app.request("DELETE", &path, None, Some(&admin)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let again = app.request("DELETE", &path, None, Some(&admin)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let status = app
        .request(
            "PUT",
            &format!("{path}/status"),
            Some(json!({ "status": "approved" })),
            Some(&admin),
        )
        .await;
    assert_eq!(status.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_status_filter_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let response = app
        .request("GET", "/api/admin/reservations?status=bogus", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "INVALID_QUERY");

    let bad_id = app
        .request(
            "DELETE",
            "/api/admin/reservations/12345",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.error(), "INVALID_PATH");
}
