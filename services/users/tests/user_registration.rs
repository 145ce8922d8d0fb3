//! End-to-end tests for the registration endpoint
//!
//! Each test boots the router on a random local port and talks to it over
//! HTTP.

use std::{collections::HashSet, net::SocketAddr, sync::Arc};

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use users::{
    AppState, create_router,
    models::{User, ValidatedUser},
    password::PasswordStorage,
    repositories::{InMemoryUserStore, UserStore},
};

async fn spawn_app(store: Arc<dyn UserStore>, password_storage: PasswordStorage) -> String {
    let app = create_router(AppState::new(store, password_storage));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn valid_user() -> Value {
    json!({
        "userName": "testUser",
        "displayName": "testDisplay",
        "password": "Password"
    })
}

#[tokio::test]
async fn post_user_when_user_is_valid_receives_ok() {
    let base = spawn_app(Arc::new(InMemoryUserStore::new()), PasswordStorage::Plain).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/1.0/users"))
        .json(&valid_user())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn post_user_when_user_is_valid_saves_it() {
    let store = InMemoryUserStore::new();
    let base = spawn_app(Arc::new(store.clone()), PasswordStorage::Plain).await;

    let body: Value = reqwest::Client::new()
        .post(format!("{base}/api/1.0/users"))
        .json(&valid_user())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    assert_eq!(body["userName"], "testUser");
    assert_eq!(body["displayName"], "testDisplay");
    assert!(body.get("password").is_none());

    let stored = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.user_name, "testUser");
    assert_eq!(stored.display_name, "testDisplay");
    assert_eq!(stored.password, "Password");
}

#[tokio::test]
async fn registered_user_can_be_fetched_by_id() {
    let base = spawn_app(Arc::new(InMemoryUserStore::new()), PasswordStorage::Plain).await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{base}/api/1.0/users"))
        .json(&valid_user())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .get(format!("{base}/api/1.0/users/{}", created["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Value = response.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn repeated_registrations_get_distinct_ids() {
    let store = InMemoryUserStore::new();
    let base = spawn_app(Arc::new(store.clone()), PasswordStorage::Plain).await;
    let client = reqwest::Client::new();

    let mut ids = HashSet::new();
    for _ in 0..5 {
        let body: Value = client
            .post(format!("{base}/api/1.0/users"))
            .json(&valid_user())
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        ids.insert(body["id"].as_str().unwrap().to_string());
    }

    assert_eq!(ids.len(), 5);
    assert_eq!(store.len().await, 5);
}

#[tokio::test]
async fn post_user_with_missing_fields_is_rejected() {
    let store = InMemoryUserStore::new();
    let base = spawn_app(Arc::new(store.clone()), PasswordStorage::Plain).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/1.0/users"))
        .json(&json!({ "userName": "testUser", "displayName": "  " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["validationErrors"]["displayName"], "displayName is required");
    assert_eq!(body["validationErrors"]["password"], "password is required");
    assert!(body["validationErrors"].get("userName").is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn post_user_with_malformed_json_is_rejected() {
    let store = InMemoryUserStore::new();
    let base = spawn_app(Arc::new(store.clone()), PasswordStorage::Plain).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/1.0/users"))
        .header("content-type", "application/json")
        .body("{\"userName\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn post_user_without_content_type_is_unsupported_media_type() {
    let store = InMemoryUserStore::new();
    let base = spawn_app(Arc::new(store.clone()), PasswordStorage::Plain).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/api/1.0/users"))
        .body(valid_user().to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let response = client
        .post(format!("{base}/api/1.0/users"))
        .header("content-type", "text/plain")
        .body(valid_user().to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn post_user_with_oversized_body_is_payload_too_large() {
    let store = InMemoryUserStore::new();
    let base = spawn_app(Arc::new(store.clone()), PasswordStorage::Plain).await;

    let oversized = json!({
        "userName": "testUser",
        "displayName": "x".repeat(3 * 1024 * 1024),
        "password": "Password"
    });

    let response = reqwest::Client::new()
        .post(format!("{base}/api/1.0/users"))
        .json(&oversized)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn argon2_mode_stores_a_hash() {
    let store = InMemoryUserStore::new();
    let base = spawn_app(Arc::new(store.clone()), PasswordStorage::Argon2).await;

    let body: Value = reqwest::Client::new()
        .post(format!("{base}/api/1.0/users"))
        .json(&valid_user())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    let stored = store.find_by_id(id).await.unwrap().unwrap();
    assert_ne!(stored.password, "Password");
    assert!(PasswordStorage::Argon2.matches(&stored.password, "Password"));
}

#[tokio::test]
async fn get_unknown_user_is_not_found() {
    let base = spawn_app(Arc::new(InMemoryUserStore::new()), PasswordStorage::Plain).await;

    let response = reqwest::get(format!("{base}/api/1.0/users/{}", Uuid::new_v4()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn get_user_with_malformed_id_is_bad_request() {
    let base = spawn_app(Arc::new(InMemoryUserStore::new()), PasswordStorage::Plain).await;

    let response = reqwest::get(format!("{base}/api/1.0/users/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

struct FailingStore;

#[async_trait]
impl UserStore for FailingStore {
    async fn create(&self, _new_user: &ValidatedUser) -> DatabaseResult<User> {
        Err(DatabaseError::Configuration("store offline".to_string()))
    }

    async fn find_by_id(&self, _id: Uuid) -> DatabaseResult<Option<User>> {
        Err(DatabaseError::Configuration("store offline".to_string()))
    }
}

#[tokio::test]
async fn storage_failure_is_internal_error() {
    let base = spawn_app(Arc::new(FailingStore), PasswordStorage::Plain).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/1.0/users"))
        .json(&valid_user())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn health_check_reports_ok() {
    let base = spawn_app(Arc::new(InMemoryUserStore::new()), PasswordStorage::Plain).await;

    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "users-service");
}
