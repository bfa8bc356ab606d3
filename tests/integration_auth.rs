mod common;

use axum::http::StatusCode;
use common::{ADMIN_PASS, ADMIN_USER, admin_token, send, test_app};
use serde_json::json;

#[tokio::test]
async fn test_login_success() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": ADMIN_USER, "password": ADMIN_PASS })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["username"], ADMIN_USER);
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": ADMIN_USER, "password": "wrong" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn test_login_username_is_trimmed() {
    let app = test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": format!("  {ADMIN_USER}  "), "password": ADMIN_PASS })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_mutation_without_token_is_forbidden() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/departments",
        None,
        Some(json!({ "id": "CS", "name": "Computer Science" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_mutation_with_garbage_token_is_forbidden() {
    let app = test_app();

    let (status, _) = send(
        &app,
        "DELETE",
        "/api/departments/CS",
        Some("not-a-jwt"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reads_are_open() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/api/departments", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_me_reflects_token() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_admin"], true);

    let (status, body) = send(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_admin"], false);
}

#[tokio::test]
async fn test_logout_and_health() {
    let app = test_app();

    let (status, body) = send(&app, "POST", "/api/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}
