mod common;

use axum::http::StatusCode;
use common::{admin_token, seed_catalog, send, test_app};
use serde_json::json;

#[tokio::test]
async fn test_create_student_validates_fields() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(json!({
            "id": "  ",
            "full_name": "No One",
            "email": "not-an-email",
            "major_dept_id": "CS",
            "year": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed.");
    assert!(body["details"]["id"].is_string());
    assert!(body["details"]["email"].is_string());
}

#[tokio::test]
async fn test_create_student_unknown_major_is_404() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(json!({
            "id": "S9",
            "full_name": "Lost Soul",
            "email": "lost@example.edu",
            "major_dept_id": "NOPE",
            "year": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Department not found.");
    assert!(body["details"]["major_dept_id"].is_string());
}

#[tokio::test]
async fn test_student_email_is_unique_case_insensitively() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(json!({
            "id": "S2",
            "full_name": "Copy Cat",
            "email": "ADA@Example.EDU",
            "major_dept_id": "CS",
            "year": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["details"]["email"].is_string());
}

#[tokio::test]
async fn test_student_list_filters() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/departments",
        Some(&token),
        Some(json!({ "id": "EE", "name": "Electrical Engineering" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(json!({
            "id": "S2",
            "full_name": "Nikola Tesla",
            "email": "nikola@example.edu",
            "major_dept_id": "EE",
            "year": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/api/students?major=EE", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "S2");

    let (status, body) = send(&app, "GET", "/api/students?q=lovelace", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "S1");
}

#[tokio::test]
async fn test_update_student_email_and_conflict() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/students",
        Some(&token),
        Some(json!({
            "id": "S2",
            "full_name": "Second Student",
            "email": "second@example.edu",
            "major_dept_id": "CS",
            "year": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Keeping your own email is not a conflict.
    let (status, _) = send(
        &app,
        "PUT",
        "/api/students/S2",
        Some(&token),
        Some(json!({ "email": "second@example.edu", "year": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Taking another student's email is.
    let (status, _) = send(
        &app,
        "PUT",
        "/api/students/S2",
        Some(&token),
        Some(json!({ "email": "ada@example.edu" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_student_delete_reports_orphaned_enrollments() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({
            "student_id": "S1",
            "section_id": "CS101-A",
            "semester": "2025F",
            "midterm": 8.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "DELETE", "/api/students/S1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orphaned"]["enrollments"], 1);
}
