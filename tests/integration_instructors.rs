mod common;

use axum::http::StatusCode;
use common::{admin_token, seed_catalog, send, test_app};
use serde_json::json;

#[tokio::test]
async fn test_instructor_requires_existing_department() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/instructors",
        Some(&token),
        Some(json!({
            "id": "X1",
            "full_name": "No Dept",
            "email": "nodept@example.edu",
            "dept_id": "NOPE"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["details"]["dept_id"].is_string());
}

#[tokio::test]
async fn test_instructor_email_is_stored_lowercased() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/instructors",
        Some(&token),
        Some(json!({
            "id": "CS-I2",
            "full_name": "Donald Knuth",
            "email": "Don.Knuth@Example.EDU",
            "dept_id": "CS",
            "title": "Professor"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "don.knuth@example.edu");
}

#[tokio::test]
async fn test_instructor_delete_reports_orphaned_sections() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(&app, "DELETE", "/api/instructors/CS-I1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
    assert_eq!(body["orphaned"]["sections"], 1);
}

#[tokio::test]
async fn test_instructor_list_filters_by_department() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(&app, "GET", "/api/instructors?dept_id=CS", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/instructors?dept_id=EE", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
