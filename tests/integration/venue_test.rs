//! Integration tests for venues, tables, availability, and health.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_venue_detail_lists_tables_by_label() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[6, 2]).await;

    let detail = app
        .request("GET", &format!("/api/venues/{venue_id}"), None, None)
        .await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.data()["name"], "Trattoria Uno");
    let tables = detail.data()["tables"].as_array().expect("tables");
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0]["label"], "T1");

    let list = app.request("GET", "/api/venues", None, None).await;
    assert_eq!(list.data()["total_items"], 1);
}

#[tokio::test]
async fn test_availability_reflects_bookings() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[2, 6]).await;
    let guest = app.customer_token("guest").await;

    app.reserve(&guest, venue_id, "19:00", 2).await;

    let slot = app
        .request(
            "GET",
            &format!(
                "/api/venues/{venue_id}/availability?date={}&time=19:00",
                helpers::tomorrow()
            ),
            None,
            None,
        )
        .await;
    assert_eq!(slot.status, StatusCode::OK, "{:?}", slot.body);
    assert_eq!(slot.data()["seats_booked"], 2);
    let tables = slot.data()["tables"].as_array().expect("tables");
    assert_eq!(tables[0]["status"], "booked");
    assert_eq!(tables[1]["status"], "available");

    let bad_time = app
        .request(
            "GET",
            &format!(
                "/api/venues/{venue_id}/availability?date={}&time=7pm",
                helpers::tomorrow()
            ),
            None,
            None,
        )
        .await;
    assert_eq!(bad_time.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_time.error(), "INVALID_QUERY");
}

#[tokio::test]
async fn test_malformed_path_and_query_use_error_body() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;
    let guest = app.customer_token("guest").await;

    let missing_date = app
        .request(
            "GET",
            &format!("/api/venues/{venue_id}/availability?time=19:00"),
            None,
            None,
        )
        .await;
    assert_eq!(missing_date.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_date.error(), "INVALID_QUERY");
    assert!(missing_date.body["message"].is_string());

    let bad_id = app
        .request(
            "POST",
            "/api/venues/not-a-uuid/reservations",
            Some(helpers::reservation_body(&helpers::tomorrow(), "19:00", 2)),
            Some(&guest),
        )
        .await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.error(), "INVALID_PATH");

    let bad_table = app
        .request(
            "DELETE",
            &format!("/api/admin/venues/{venue_id}/tables/42"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(bad_table.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_table.error(), "INVALID_PATH");

    let bad_page = app
        .request("GET", "/api/venues?page=first", None, None)
        .await;
    assert_eq!(bad_page.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_page.error(), "INVALID_QUERY");
}

#[tokio::test]
async fn test_tables_added_to_pooled_venue_keep_earlier_guests() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[]).await;
    let guest = app.customer_token("guest").await;

    let pooled = app.reserve(&guest, venue_id, "19:00", 8).await;
    assert_eq!(pooled.status, StatusCode::CREATED, "{:?}", pooled.body);

    let table = app
        .request(
            "POST",
            &format!("/api/admin/venues/{venue_id}/tables"),
            Some(json!({ "label": "T1", "capacity": 4 })),
            Some(&admin),
        )
        .await;
    assert_eq!(table.status, StatusCode::CREATED);

    let second = app.reserve(&guest, venue_id, "19:00", 4).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.error(), "SLOT_CONFLICT");

    let slot = app
        .request(
            "GET",
            &format!(
                "/api/venues/{venue_id}/availability?date={}&time=19:00",
                helpers::tomorrow()
            ),
            None,
            None,
        )
        .await;
    assert_eq!(slot.data()["unseated"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_pooled_venue_counts_seats() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[]).await;
    let guest = app.customer_token("guest").await;

    assert_eq!(
        app.reserve(&guest, venue_id, "13:00", 10).await.status,
        StatusCode::CREATED
    );
    assert_eq!(
        app.reserve(&guest, venue_id, "13:00", 10).await.status,
        StatusCode::CREATED
    );
    let third = app.reserve(&guest, venue_id, "13:00", 1).await;
    assert_eq!(third.status, StatusCode::CONFLICT);
    assert_eq!(third.error(), "SLOT_CONFLICT");
}

#[tokio::test]
async fn test_requested_table_too_small() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[2]).await;
    let guest = app.customer_token("guest").await;

    let detail = app
        .request("GET", &format!("/api/venues/{venue_id}"), None, None)
        .await;
    let table_id = detail.data()["tables"][0]["id"].clone();

    let mut body = helpers::reservation_body(&helpers::tomorrow(), "19:00", 4);
    body["tableId"] = table_id;
    let response = app
        .request(
            "POST",
            &format!("/api/venues/{venue_id}/reservations"),
            Some(body),
            Some(&guest),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "TABLE_CAPACITY_EXCEEDED");
}

#[tokio::test]
async fn test_venue_update_and_delete() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;
    let path = format!("/api/admin/venues/{venue_id}");

    let updated = app
        .request(
            "PUT",
            &path,
            Some(json!({ "closes_at": "21:00", "phone": "555-0199" })),
            Some(&admin),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{:?}", updated.body);
    assert_eq!(updated.data()["phone"], "555-0199");

    let guest = app.customer_token("guest").await;
    let late = app.reserve(&guest, venue_id, "22:00", 2).await;
    assert_eq!(late.error(), "OUTSIDE_OPERATING_HOURS");

    let inverted = app
        .request(
            "PUT",
            &path,
            Some(json!({ "opens_at": "22:00" })),
            Some(&admin),
        )
        .await;
    assert_eq!(inverted.status, StatusCode::BAD_REQUEST);

    let deleted = app.request("DELETE", &path, None, Some(&admin)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let gone = app
        .request("GET", &format!("/api/venues/{venue_id}"), None, None)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_table_label_conflicts() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let venue_id = app.create_venue(&admin, &[4]).await;

    let response = app
        .request(
            "POST",
            &format!("/api/admin/venues/{venue_id}/tables"),
            Some(json!({ "label": "T1", "capacity": 2 })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let invalid = app
        .request(
            "POST",
            &format!("/api/admin/venues/{venue_id}/tables"),
            Some(json!({ "label": "T2", "capacity": 0 })),
            Some(&admin),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.error(), "INVALID_BODY");
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;

    let basic = app.request("GET", "/api/health", None, None).await;
    assert_eq!(basic.status, StatusCode::OK);
    assert_eq!(basic.data()["status"], "ok");

    let detailed = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(detailed.status, StatusCode::OK);
    assert_eq!(detailed.data()["backend"], "memory");
    assert_eq!(detailed.data()["store"], "connected");
}
