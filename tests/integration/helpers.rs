//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use tablebook_admission::store::MemoryBookingStore;
use tablebook_admission::{AdmissionEngine, FixedClock};
use tablebook_api::AppState;
use tablebook_auth::jwt::{JwtDecoder, JwtEncoder};
use tablebook_auth::password::{PasswordHasher, PasswordValidator};
use tablebook_core::config::{AppConfig, StoreBackend};
use tablebook_entity::user::UserRole;
use tablebook_service::user::NewAccount;
use tablebook_service::{AccountService, MemoryUserStore};

/// Password that satisfies the default policy.
pub const PASSWORD: &str = "Velvet-Lobster-Orchard-42";

/// The date the test clock reports as today.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 1).expect("valid date")
}

/// `today() + 1`, as an ISO string.
pub fn tomorrow() -> String {
    (today() + chrono::Duration::days(1)).to_string()
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Account service, for seeding users directly
    pub accounts: AccountService,
}

/// Status and decoded JSON body of a response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `error` code of an error body.
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    /// Create a new test application over fresh in-memory stores
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.backend = StoreBackend::Memory;
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let engine = AdmissionEngine::new(
            Arc::new(MemoryBookingStore::new()),
            Duration::from_secs(5),
        )
        .with_clock(Arc::new(FixedClock(today())));

        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let accounts = AccountService::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(PasswordHasher::new()),
            Arc::new(PasswordValidator::new(&config.auth)),
            Arc::new(JwtEncoder::new(&config.auth)),
            Arc::clone(&jwt_decoder),
            Duration::from_secs(5),
        );

        let server = config.server.clone();
        let state = AppState::new(config, engine, accounts.clone(), jwt_decoder);
        let router = tablebook_api::build_app(state, &server);

        Self { router, accounts }
    }

    /// Create a user with `role` and return its id
    pub async fn create_user(&self, username: &str, role: UserRole) -> Uuid {
        let account = NewAccount {
            username: username.to_string(),
            email: Some(format!("{username}@example.com")),
            password: PASSWORD.to_string(),
            display_name: None,
        };
        self.accounts
            .create_user(&account, role)
            .await
            .expect("Failed to create user")
            .id
    }

    /// Log in and return the access token
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "username": username, "password": PASSWORD })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.data()["access_token"]
            .as_str()
            .expect("access token")
            .to_string()
    }

    /// Create an admin account and return its token
    pub async fn admin_token(&self) -> String {
        self.create_user("admin", UserRole::Admin).await;
        self.login("admin").await
    }

    /// Create a customer account and return its token
    pub async fn customer_token(&self, username: &str) -> String {
        self.create_user(username, UserRole::Customer).await;
        self.login(username).await
    }

    /// Create a restaurant open 10:00-23:00 with one table per capacity
    pub async fn create_venue(&self, admin: &str, tables: &[i32]) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/admin/venues",
                Some(json!({
                    "name": "Trattoria Uno",
                    "kind": "restaurant",
                    "opens_at": "10:00",
                    "closes_at": "23:00",
                    "max_party_size": 10,
                    "seat_capacity": 20,
                })),
                Some(admin),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        let venue_id: Uuid = serde_json::from_value(response.data()["id"].clone())
            .expect("venue id");

        for (i, capacity) in tables.iter().enumerate() {
            let response = self
                .request(
                    "POST",
                    &format!("/api/admin/venues/{venue_id}/tables"),
                    Some(json!({ "label": format!("T{}", i + 1), "capacity": capacity })),
                    Some(admin),
                )
                .await;
            assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        }

        venue_id
    }

    /// Submit a reservation for tomorrow
    pub async fn reserve(
        &self,
        token: &str,
        venue_id: Uuid,
        time: &str,
        party_size: i64,
    ) -> TestResponse {
        self.request(
            "POST",
            &format!("/api/venues/{venue_id}/reservations"),
            Some(reservation_body(&tomorrow(), time, party_size)),
            Some(token),
        )
        .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// A complete reservation request body
pub fn reservation_body(date: &str, time: &str, party_size: i64) -> Value {
    json!({
        "customerName": "Ada Lovelace",
        "email": "ada@example.com",
        "phone": "+44 20 7946 0000",
        "date": date,
        "time": time,
        "partySize": party_size,
    })
}
