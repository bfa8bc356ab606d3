mod common;

use axum::http::StatusCode;
use common::{admin_token, seed_catalog, send, send_raw, test_app};
use serde_json::json;

/// CS101 (3 credits) graded A, CS201 (4 credits) graded B.
async fn seed_graded_pair(app: &axum::Router, token: &str) {
    seed_catalog(app, token).await;

    let (status, _) = send(
        app,
        "POST",
        "/api/courses",
        Some(token),
        Some(json!({
            "id": "CS201",
            "title": "Data Structures",
            "credits": 4,
            "dept_id": "CS"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        app,
        "POST",
        "/api/sections",
        Some(token),
        Some(json!({
            "id": "CS201-A",
            "course_id": "CS201",
            "semester": "2025F",
            "section_no": "A",
            "instructor_id": "CS-I1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // raw 9.6 -> A, raw 8.5 -> B.
    for (section, midterm, final_score, bonus) in [
        ("CS101-A", 8.0, 9.0, Some(1.0)),
        ("CS201-A", 8.5, 8.5, None),
    ] {
        let (status, body) = send(
            app,
            "POST",
            "/api/enrollments",
            Some(token),
            Some(json!({
                "student_id": "S1",
                "section_id": section,
                "semester": "2025F",
                "midterm": midterm,
                "final": final_score,
                "bonus": bonus
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "enroll failed: {body}");
    }
}

#[tokio::test]
async fn test_gpa_weights_by_credits() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_graded_pair(&app, &token).await;

    let (status, body) = send(&app, "GET", "/api/reports/gpa/S1", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student_id"], "S1");
    assert_eq!(body["total_credits"], 7.0);
    // (4.0 * 3 + 3.0 * 4) / 7 = 3.43
    assert_eq!(body["gpa"], 3.43);

    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0]["course_id"], "CS101");
    assert_eq!(details[0]["letter"], "A");
    assert_eq!(details[1]["course_id"], "CS201");
    assert_eq!(details[1]["letter"], "B");
}

#[tokio::test]
async fn test_gpa_is_null_without_graded_credit() {
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

    let (status, body) = send(&app, "GET", "/api/reports/gpa/S1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gpa"], json!(null));
    assert_eq!(body["total_credits"], 0.0);

    let (status, _) = send(&app, "GET", "/api/reports/gpa/GHOST", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_course_stats_distribution() {
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

    // One graded enrollment and one with no scores at all.
    let (status, _) = send(
        &app,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({
            "student_id": "S1",
            "section_id": "CS101-A",
            "semester": "2025F",
            "midterm": 9.5,
            "final": 9.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        "POST",
        "/api/enrollments",
        Some(&token),
        Some(json!({
            "student_id": "S2",
            "section_id": "CS101-A",
            "semester": "2025F"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "GET", "/api/reports/course-stats/CS101", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["course_id"], "CS101");
    assert_eq!(body["course_title"], "Intro to Programming");
    assert_eq!(body["count"], 2);
    // Averages skip the enrollment without scores instead of zeroing it.
    assert_eq!(body["avg_midterm"], 9.5);
    assert_eq!(body["avg_final"], 9.5);

    let distribution = body["distribution"].as_array().unwrap();
    assert_eq!(distribution.len(), 2);
    assert_eq!(distribution[0]["letter"], "A");
    assert_eq!(distribution[0]["count"], 1);
    // The ungraded bucket sorts last.
    assert_eq!(distribution[1]["letter"], "N/A");
    assert_eq!(distribution[1]["count"], 1);

    let (status, _) = send(&app, "GET", "/api/reports/course-stats/GHOST", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_csv_export() {
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

    let (status, headers, bytes) =
        send_raw(&app, "GET", "/api/reports/enrollments.csv", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "text/csv");
    assert!(
        headers["content-disposition"]
            .to_str()
            .unwrap()
            .contains("enrollments.csv")
    );

    let content = String::from_utf8(bytes).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "student_id,section_id,course_id,semester,midterm,final,bonus,letter"
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("S1,CS101-A,CS101,2025F,8,"));

    // Semester-scoped export carries the semester in its filename.
    let (status, headers, _) = send_raw(
        &app,
        "GET",
        "/api/reports/enrollments.csv?semester=2025f",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        headers["content-disposition"]
            .to_str()
            .unwrap()
            .contains("enrollments_2025F.csv")
    );
}
