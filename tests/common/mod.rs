use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use registrar::config::cors::CorsConfig;
use registrar::config::jwt::JwtConfig;
use registrar::grading::GradeScale;
use registrar::modules::auth::verifier::EnvCredentials;
use registrar::repo::memory::MemRepository;
use registrar::router::init_router;
use registrar::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ADMIN_USER: &str = "registrar-admin";
pub const ADMIN_PASS: &str = "registrar-pass";

/// Full application router over an in-memory repository and fixed test
/// credentials, so tests exercise the real extractor/handler stack.
pub fn test_app() -> Router {
    let state = AppState {
        repo: Arc::new(MemRepository::new()),
        auth: Arc::new(EnvCredentials::new(ADMIN_USER, ADMIN_PASS)),
        jwt_config: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry: 3600,
        },
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        grade_scale: GradeScale::default(),
    };
    init_router(state)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, bytes) = send_raw(app, method, uri, token, body).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

pub async fn admin_token(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": ADMIN_USER, "password": ADMIN_PASS })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "admin login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Creates one record of every kind so dependent tests have references to
/// point at: department CS, instructor CS-I1, student S1, course CS101 (3
/// credits), section CS101-A in 2025F.
#[allow(dead_code)]
pub async fn seed_catalog(app: &Router, token: &str) {
    let fixtures = [
        (
            "/api/departments",
            json!({ "id": "CS", "name": "Computer Science" }),
        ),
        (
            "/api/instructors",
            json!({
                "id": "CS-I1",
                "full_name": "Grace Hopper",
                "email": "grace@example.edu",
                "dept_id": "CS"
            }),
        ),
        (
            "/api/students",
            json!({
                "id": "S1",
                "full_name": "Ada Lovelace",
                "email": "ada@example.edu",
                "major_dept_id": "CS",
                "year": 2
            }),
        ),
        (
            "/api/courses",
            json!({
                "id": "CS101",
                "title": "Intro to Programming",
                "credits": 3,
                "dept_id": "CS"
            }),
        ),
        (
            "/api/sections",
            json!({
                "id": "CS101-A",
                "course_id": "CS101",
                "semester": "2025F",
                "section_no": "A",
                "instructor_id": "CS-I1"
            }),
        ),
    ];

    for (uri, body) in fixtures {
        let (status, response) = send(app, "POST", uri, Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "seeding {uri} failed: {response}");
    }
}
