mod common;

use axum::http::StatusCode;
use common::{admin_token, seed_catalog, send, test_app};
use serde_json::json;

async fn enroll(app: &axum::Router, token: &str, student: &str, section: &str, midterm: f64) {
    let (status, body) = send(
        app,
        "POST",
        "/api/enrollments",
        Some(token),
        Some(json!({
            "student_id": student,
            "section_id": section,
            "semester": "2025F",
            "midterm": midterm,
            "final": midterm
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "enroll failed: {body}");
}

#[tokio::test]
async fn test_stats_on_empty_data_set() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/api/stats", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["departments"], 0);
    assert_eq!(body["totals"]["enrollments"], 0);
    assert_eq!(body["students_by_major"], json!([]));
    assert_eq!(body["grade_distribution"], json!([]));
}

#[tokio::test]
async fn test_stats_aggregates() {
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
            "full_name": "Alan Turing",
            "email": "alan@example.edu",
            "major_dept_id": "CS",
            "year": 4
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    enroll(&app, &token, "S1", "CS101-A", 9.0).await;
    enroll(&app, &token, "S2", "CS101-A", 7.0).await;

    let (status, body) = send(&app, "GET", "/api/stats", None, None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["totals"]["students"], 2);
    assert_eq!(body["totals"]["enrollments"], 2);

    assert_eq!(body["students_by_major"][0]["major_dept_id"], "CS");
    assert_eq!(body["students_by_major"][0]["count"], 2);

    assert_eq!(body["enrollments_by_semester"][0]["semester"], "2025F");
    assert_eq!(body["enrollments_by_semester"][0]["count"], 2);

    // raw = midterm since midterm == final: 9.0 and 7.0 average to 8.0.
    let section_avg = &body["avg_score_by_section"][0];
    assert_eq!(section_avg["section_id"], "CS101-A");
    assert_eq!(section_avg["count"], 2);
    assert_eq!(section_avg["avg_score"], 8.0);

    let course_avg = &body["avg_score_by_course"][0];
    assert_eq!(course_avg["course_id"], "CS101");
    assert_eq!(course_avg["avg_score"], 8.0);

    let top = &body["top_courses_by_enrollment"][0];
    assert_eq!(top["course_id"], "CS101");
    assert_eq!(top["title"], "Intro to Programming");
    assert_eq!(top["count"], 2);
}

#[tokio::test]
async fn test_ungraded_enrollments_stay_out_of_averages() {
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
            "semester": "2025F"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/api/stats", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totals"]["enrollments"], 1);
    assert_eq!(body["avg_score_by_section"], json!([]));
    assert_eq!(body["grade_distribution"], json!([]));
}
