use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{course_stats, enrollments_csv, student_gpa};

/// Routes: GET /gpa/{student_id}, GET /course-stats/{course_id},
/// GET /enrollments.csv
pub fn init_reports_router() -> Router<AppState> {
    Router::new()
        .route("/gpa/{student_id}", get(student_gpa))
        .route("/course-stats/{course_id}", get(course_stats))
        .route("/enrollments.csv", get(enrollments_csv))
}
