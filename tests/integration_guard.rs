mod common;

use axum::http::{StatusCode, header};
use common::{
    TEST_SECRET, empty_request, json_request, register_admin, register_student, register_teacher,
    send, test_app,
};
use rollcall_auth::{TokenClaims, TokenCodec};
use rollcall_config::AuthConfig;
use rollcall_models::Role;
use serde_json::json;

#[tokio::test]
async fn test_public_route_admits_without_header() {
    let app = test_app();

    // Reaches the handler: a 401 here would come from the credentials, not the guard.
    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "nobody@uni.edu", "password": "whatever-1" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_public_route_ignores_bad_token() {
    let app = test_app();

    let (status, _) = send(
        &app.router,
        json_request(
            "POST",
            "/api/auth/register",
            common::staff_body("t@uni.edu", "TEACHER"),
            Some("garbage"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = test_app();

    for (method, uri) in [
        ("GET", "/api/auth/me"),
        ("POST", "/api/auth/refresh"),
        ("GET", "/api/auth/probe/admin"),
        ("GET", "/api/auth/probe/staff"),
    ] {
        let (status, body) = send(&app.router, empty_request(method, uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["error"], "Missing authorization header");
    }
}

#[tokio::test]
async fn test_malformed_header_is_unauthorized() {
    let app = test_app();
    let request = axum::http::Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, "Token abc")
        .body(axum::body::Body::empty())
        .unwrap();

    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid authorization header format");
}

#[tokio::test]
async fn test_token_failures_share_one_message() {
    let app = test_app();
    let (token, _) = register_teacher(&app, "t@uni.edu").await;

    let other_codec = TokenCodec::new(
        &AuthConfig::new("a-completely-different-secret-of-32-bytes", 3600, 4).unwrap(),
    );
    let now = chrono::Utc::now().timestamp();
    let expired = TokenCodec::new(&AuthConfig::new(TEST_SECRET, 3600, 4).unwrap())
        .sign(&TokenClaims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "t@uni.edu".to_string(),
            role: Role::Teacher,
            iat: now - 120,
            exp: now - 60,
        })
        .unwrap();
    let foreign = other_codec
        .sign(&TokenClaims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "t@uni.edu".to_string(),
            role: Role::Admin,
            iat: now,
            exp: now + 60,
        })
        .unwrap();

    // Our header and payload under a signature made with another key.
    let (signed_part, _) = token.rsplit_once('.').unwrap();
    let (_, foreign_signature) = foreign.rsplit_once('.').unwrap();
    let tampered = format!("{signed_part}.{foreign_signature}");

    for bad in ["not-a-jwt", tampered.as_str(), expired.as_str(), foreign.as_str()] {
        let (status, body) = send(&app.router, empty_request("GET", "/api/auth/me", Some(bad))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid or expired token");
    }
}

#[tokio::test]
async fn test_admin_probe() {
    let app = test_app();
    let (admin_token, admin_id) = register_admin(&app, "root@uni.edu").await;
    let (teacher_token, _) = register_teacher(&app, "t@uni.edu").await;
    let (student_token, _) = register_student(&app, "s@uni.edu", "S-1").await;

    let (status, body) = send(
        &app.router,
        empty_request("GET", "/api/auth/probe/admin", Some(&admin_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["principalId"], admin_id);
    assert_eq!(body["role"], "ADMIN");

    for token in [&teacher_token, &student_token] {
        let (status, _) = send(
            &app.router,
            empty_request("GET", "/api/auth/probe/admin", Some(token)),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn test_staff_probe() {
    let app = test_app();
    let (admin_token, _) = register_admin(&app, "root@uni.edu").await;
    let (teacher_token, teacher_id) = register_teacher(&app, "t@uni.edu").await;
    let (student_token, _) = register_student(&app, "s@uni.edu", "S-1").await;

    let (status, body) = send(
        &app.router,
        empty_request("GET", "/api/auth/probe/staff", Some(&teacher_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["principalId"], teacher_id);

    let (status, _) = send(
        &app.router,
        empty_request("GET", "/api/auth/probe/staff", Some(&admin_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app.router,
        empty_request("GET", "/api/auth/probe/staff", Some(&student_token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_requires_admin() {
    let app = test_app();
    let (teacher_token, _) = register_teacher(&app, "t@uni.edu").await;
    let (_, student_id) = register_student(&app, "s@uni.edu", "S-1").await;

    let (status, _) = send(
        &app.router,
        empty_request(
            "DELETE",
            &format!("/api/auth/accounts/{student_id}"),
            Some(&teacher_token),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(app.store.account_count(), 2);
}
