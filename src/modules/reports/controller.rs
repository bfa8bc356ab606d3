use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
};
use anyhow::Context;
use tracing::instrument;

use crate::modules::reports::model::{CourseStatsReport, GpaReport, ReportParams};
use crate::modules::reports::service::ReportService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// GPA over a student's graded enrollments, weighted by course credits
#[utoipa::path(
    get,
    path = "/api/reports/gpa/{student_id}",
    summary = "Student GPA report",
    params(
        ("student_id" = String, Path, description = "Student ID"),
        ReportParams
    ),
    responses(
        (status = 200, description = "GPA report", body = GpaReport),
        (status = 404, description = "Student not found"),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn student_gpa(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Query(params): Query<ReportParams>,
) -> Result<Json<GpaReport>, AppError> {
    let report = ReportService::student_gpa(
        state.repo.as_ref(),
        student_id.trim(),
        params.semester.as_deref(),
    )
    .await?;
    Ok(Json(report))
}

/// Enrollment count, score averages and letter distribution for one course
#[utoipa::path(
    get,
    path = "/api/reports/course-stats/{course_id}",
    summary = "Course statistics report",
    params(
        ("course_id" = String, Path, description = "Course ID"),
        ReportParams
    ),
    responses(
        (status = 200, description = "Course statistics", body = CourseStatsReport),
        (status = 404, description = "Course not found"),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn course_stats(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(params): Query<ReportParams>,
) -> Result<Json<CourseStatsReport>, AppError> {
    let report = ReportService::course_stats(
        state.repo.as_ref(),
        course_id.trim(),
        params.semester.as_deref(),
    )
    .await?;
    Ok(Json(report))
}

/// CSV export of enrollments, optionally restricted to one semester
#[utoipa::path(
    get,
    path = "/api/reports/enrollments.csv",
    summary = "Enrollments CSV export",
    params(ReportParams),
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv"),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn enrollments_csv(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> Result<impl IntoResponse, AppError> {
    let export =
        ReportService::enrollments_csv(state.repo.as_ref(), params.semester.as_deref()).await?;

    let disposition = format!("attachment; filename={}", export.filename);
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .context("build content-disposition header")
            .map_err(AppError::internal)?,
    );

    Ok((headers, export.content))
}
