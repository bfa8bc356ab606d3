mod common;

use axum::http::StatusCode;
use common::{admin_token, seed_catalog, send, test_app};
use serde_json::json;

#[tokio::test]
async fn test_department_crud_roundtrip() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/departments",
        Some(&token),
        Some(json!({ "id": " MATH ", "name": "Mathematics", "office": "Bldg 2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "MATH");
    assert_eq!(body["name"], "Mathematics");

    let (status, body) = send(&app, "GET", "/api/departments/MATH", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["office"], "Bldg 2");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/departments/MATH",
        Some(&token),
        Some(json!({ "name": "Applied Mathematics" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Applied Mathematics");
    assert_eq!(body["office"], "Bldg 2");

    let (status, body) = send(&app, "DELETE", "/api/departments/MATH", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (status, _) = send(&app, "GET", "/api/departments/MATH", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_department_id_conflicts() {
    let app = test_app();
    let token = admin_token(&app).await;

    let dto = json!({ "id": "CS", "name": "Computer Science" });
    let (status, _) = send(&app, "POST", "/api/departments", Some(&token), Some(dto.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/departments", Some(&token), Some(dto)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["details"]["id"].is_string());
}

#[tokio::test]
async fn test_department_list_filter() {
    let app = test_app();
    let token = admin_token(&app).await;

    for (id, name) in [("CS", "Computer Science"), ("HIST", "History")] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/departments",
            Some(&token),
            Some(json!({ "id": id, "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/departments?q=comp", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "CS");
}

#[tokio::test]
async fn test_department_delete_reports_orphans() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(&app, "DELETE", "/api/departments/CS", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);
    assert_eq!(body["orphaned"]["courses"], 1);
    assert_eq!(body["orphaned"]["instructors"], 1);
    assert_eq!(body["orphaned"]["students"], 1);

    // Dependents stay in place as orphans.
    let (status, _) = send(&app, "GET", "/api/students/S1", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_empty_patch_is_rejected() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/departments/CS",
        Some(&token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No changes supplied.");
}

#[tokio::test]
async fn test_department_id_cannot_change() {
    let app = test_app();
    let token = admin_token(&app).await;
    seed_catalog(&app, &token).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/departments/CS",
        Some(&token),
        Some(json!({ "id": "EE", "name": "Electrical Engineering" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["id"].as_str().unwrap().contains("cannot be changed"));
}
