#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use rollcall::router::init_router;
use rollcall::state::AppState;
use rollcall::store::InMemoryCredentialStore;
use rollcall_config::{AuthConfig, CorsConfig, RateLimitConfig};
use rollcall_models::ClassroomId;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const PASSWORD: &str = "correct-horse-9";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryCredentialStore>,
    pub classroom: ClassroomId,
}

pub fn auth_config() -> AuthConfig {
    AuthConfig::new(TEST_SECRET, 3600, 4).unwrap()
}

/// Router over an in-memory store with one classroom and no rate limiting.
pub fn test_app() -> TestApp {
    test_app_with_rate_limit(RateLimitConfig::disabled())
}

pub fn test_app_with_rate_limit(rate_limit_config: RateLimitConfig) -> TestApp {
    let store = Arc::new(InMemoryCredentialStore::new());
    let classroom = store.add_classroom("CS-101");

    let state = AppState::new(
        store.clone(),
        &auth_config(),
        CorsConfig::from_origins("http://localhost:5173"),
        rate_limit_config,
    );

    TestApp {
        router: init_router(state),
        store,
        classroom,
    }
}

pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Status and JSON body. Empty or non-JSON bodies come back as `Value::Null`.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn student_body(email: &str, code: &str, classroom: ClassroomId) -> Value {
    json!({
        "email": email,
        "password": PASSWORD,
        "role": "STUDENT",
        "fullName": "Ada Lovelace",
        "studentCode": code,
        "classroomId": classroom.to_string(),
    })
}

pub fn staff_body(email: &str, role: &str) -> Value {
    json!({
        "email": email,
        "password": PASSWORD,
        "role": role,
        "fullName": "Grace Hopper",
    })
}

/// Registers through the API and returns `(token, identity id)`.
pub async fn register(app: &TestApp, body: Value) -> (String, String) {
    let (status, body) = send(
        &app.router,
        json_request("POST", "/api/auth/register", body, None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");

    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

pub async fn register_student(app: &TestApp, email: &str, code: &str) -> (String, String) {
    register(app, student_body(email, code, app.classroom)).await
}

pub async fn register_teacher(app: &TestApp, email: &str) -> (String, String) {
    register(app, staff_body(email, "TEACHER")).await
}

pub async fn register_admin(app: &TestApp, email: &str) -> (String, String) {
    register(app, staff_body(email, "ADMIN")).await
}
