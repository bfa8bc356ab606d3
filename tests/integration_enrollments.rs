mod common;

use axum::http::StatusCode;
use common::{admin_token, seed_catalog, send, test_app};
use serde_json::json;

#[tokio::test]
async fn test_create_derives_letter_and_default_id() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({
            "student_id": "S1",
            "section_id": "CS101-A",
            "semester": "2025F",
            "midterm": 8.0,
            "final": 9.0,
            "bonus": 1.0
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "S1:CS101-A");
    // 0.4 * 8 + 0.6 * 9 + 1 = 9.6
    assert_eq!(body["letter"], "A");
    assert_eq!(body["student_name"], "Ada Lovelace");
    assert_eq!(body["course_title"], "Intro to Programming");
}

#[tokio::test]
async fn test_create_without_scores_has_no_letter() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({
            "student_id": "S1",
            "section_id": "CS101-A",
            "semester": "2025F"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("letter").is_none());
}

#[tokio::test]
async fn test_unknown_references_are_404() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({
            "student_id": "GHOST",
            "section_id": "CS101-A",
            "semester": "2025F"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["details"]["student_id"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({
            "student_id": "S1",
            "section_id": "GHOST",
            "semester": "2025F"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["details"]["section_id"].is_string());
}

#[tokio::test]
async fn test_duplicate_pair_conflicts() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let dto = json!({
        "student_id": "S1",
        "section_id": "CS101-A",
        "semester": "2025F"
    });
    let (status, _) = send(&app, "POST", "/api/enrollments", Some(&token), Some(dto)).await;
    assert_eq!(status, StatusCode::CREATED);

    // A fresh id does not get around the pair constraint.
    let (status, body) = send(
        &app,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({
            "id": "other-id",
            "student_id": "S1",
            "section_id": "CS101-A",
            "semester": "2025F"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "Enrollment already exists for this student and section."
    );
}

#[tokio::test]
async fn test_score_update_recomputes_letter() {
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
            "midterm": 8.0,
            "final": 9.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Only the final changes; the stored midterm joins the recomputation.
    let (status, body) = send(
        &app,
        "PUT",
        "/api/enrollments/S1:CS101-A",
        Some(&token),
        Some(json!({ "final": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // 0.4 * 8 + 0.6 * 10 = 9.2
    assert_eq!(body["letter"], "A-");
    assert_eq!(body["midterm"], 8.0);
}

#[tokio::test]
async fn test_explicit_null_clears_score_and_letter() {
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

    let (status, body) = send(
        &app,
        "PUT",
        "/api/enrollments/S1:CS101-A",
        Some(&token),
        Some(json!({ "midterm": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("midterm").is_none());
    assert!(body.get("letter").is_none());
}

#[tokio::test]
async fn test_out_of_range_scores_are_rejected() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({
            "student_id": "S1",
            "section_id": "CS101-A",
            "semester": "2025F",
            "midterm": 11.0
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["midterm"].is_string());

    // Patches run the same bounds check on the unwrapped score.
    let (status, _) = send(
        &app,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({
            "student_id": "S1",
            "section_id": "CS101-A",
            "semester": "2025F"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/enrollments/S1:CS101-A",
        Some(&token),
        Some(json!({ "bonus": -1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["bonus"].is_string());
}

#[tokio::test]
async fn test_failed_move_leaves_record_intact() {
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
            "midterm": 7.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/enrollments/S1:CS101-A",
        Some(&token),
        Some(json!({ "section_id": "GHOST" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/enrollments/S1:CS101-A", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["section_id"], "CS101-A");
    assert_eq!(body["midterm"], 7.0);
}
