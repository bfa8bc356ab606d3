mod common;

use axum::http::StatusCode;
use common::{admin_token, seed_catalog, send, test_app};
use serde_json::json;

#[tokio::test]
async fn test_section_view_carries_course_context() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(&app, "GET", "/api/sections/CS101-A", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["course_title"], "Intro to Programming");
    assert_eq!(body["course_dept_id"], "CS");
    assert_eq!(body["course_credits"], 3);
}

#[tokio::test]
async fn test_semester_is_normalized_on_create() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/sections",
        Some(&token),
        Some(json!({
            "id": "CS101-B",
            "course_id": "CS101",
            "semester": "2025f",
            "section_no": "B",
            "instructor_id": "CS-I1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["semester"], "2025F");
}

#[tokio::test]
async fn test_duplicate_section_number_conflicts() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    // Same course, same semester, same number.
    let (status, body) = send(
        &app,
        "POST",
        "/api/sections",
        Some(&token),
        Some(json!({
            "id": "CS101-DUP",
            "course_id": "CS101",
            "semester": "2025f",
            "section_no": "A",
            "instructor_id": "CS-I1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["details"]["section_no"].is_string());

    // Same number in a different semester is fine.
    let (status, _) = send(
        &app,
        "POST",
        "/api/sections",
        Some(&token),
        Some(json!({
            "id": "CS101-S2",
            "course_id": "CS101",
            "semester": "2026S",
            "section_no": "A",
            "instructor_id": "CS-I1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_update_detects_slot_collision_on_merged_record() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/sections",
        Some(&token),
        Some(json!({
            "id": "CS101-B",
            "course_id": "CS101",
            "semester": "2025F",
            "section_no": "B",
            "instructor_id": "CS-I1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Renumbering B onto A's slot collides even though course and semester
    // come from the stored record.
    let (status, _) = send(
        &app,
        "PUT",
        "/api/sections/CS101-B",
        Some(&token),
        Some(json!({ "section_no": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Touching an unrelated field never trips the slot check.
    let (status, body) = send(
        &app,
        "PUT",
        "/api/sections/CS101-B",
        Some(&token),
        Some(json!({ "room": "R201" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room"], "R201");
}

#[tokio::test]
async fn test_schedule_slots_are_validated() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/sections",
        Some(&token),
        Some(json!({
            "id": "CS101-C",
            "course_id": "CS101",
            "semester": "2025F",
            "section_no": "C",
            "instructor_id": "CS-I1",
            "schedule": [{ "day": "mon", "start": "11:00", "end": "10:00" }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed.");
}

#[tokio::test]
async fn test_section_list_filters_by_semester() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/sections",
        Some(&token),
        Some(json!({
            "id": "CS101-S2",
            "course_id": "CS101",
            "semester": "2026S",
            "section_no": "A",
            "instructor_id": "CS-I1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // The query-side semester is normalized the same way as stored ones.
    let (status, body) = send(&app, "GET", "/api/sections?semester=2026s", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "CS101-S2");
}
