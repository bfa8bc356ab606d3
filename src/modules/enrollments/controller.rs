use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AdminUser;
use crate::modules::integrity::DeleteOutcome;
use crate::repo::EnrollmentFilter;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::paging::check_limit;
use crate::utils::strings::normalize_semester;
use crate::validator::ValidatedJson;

use super::model::{
    CreateEnrollmentDto, EnrollmentListParams, EnrollmentView, UpdateEnrollmentDto,
};
use super::service::EnrollmentService;

/// List enrollments with student and section context
#[utoipa::path(
    get,
    path = "/api/enrollments",
    params(EnrollmentListParams),
    responses(
        (status = 200, description = "List of enrollments", body = Vec<EnrollmentView>),
        (status = 400, description = "Invalid limit"),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn list_enrollments(
    State(state): State<AppState>,
    Query(params): Query<EnrollmentListParams>,
) -> Result<Json<Vec<EnrollmentView>>, AppError> {
    let filter = EnrollmentFilter {
        student_id: params.student_id,
        section_id: params.section_id,
        semester: params.semester.as_deref().map(normalize_semester),
        limit: check_limit(params.limit)?,
    };
    let enrollments = EnrollmentService::list(state.repo.as_ref(), &filter).await?;
    Ok(Json(enrollments))
}

/// Get an enrollment by ID
#[utoipa::path(
    get,
    path = "/api/enrollments/{id}",
    params(("id" = String, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment details", body = EnrollmentView),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_enrollment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EnrollmentView>, AppError> {
    let enrollment = EnrollmentService::get(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(enrollment))
}

/// Enroll a student in a section; the letter grade is derived from the scores
#[utoipa::path(
    post,
    path = "/api/enrollments",
    request_body = CreateEnrollmentDto,
    responses(
        (status = 201, description = "Enrollment created", body = EnrollmentView),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Student or section not found"),
        (status = 409, description = "Student already enrolled in this section")
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_enrollment(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    ValidatedJson(dto): ValidatedJson<CreateEnrollmentDto>,
) -> Result<(StatusCode, Json<EnrollmentView>), AppError> {
    let enrollment =
        EnrollmentService::create(state.repo.as_ref(), &state.grade_scale, dto).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Update an enrollment; score changes recompute the letter grade
#[utoipa::path(
    put,
    path = "/api/enrollments/{id}",
    params(("id" = String, Path, description = "Enrollment ID")),
    request_body = UpdateEnrollmentDto,
    responses(
        (status = 200, description = "Enrollment updated", body = EnrollmentView),
        (status = 400, description = "Validation failed or empty patch"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Enrollment, student or section not found"),
        (status = 409, description = "Student already enrolled in this section")
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_enrollment(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateEnrollmentDto>,
) -> Result<Json<EnrollmentView>, AppError> {
    let enrollment =
        EnrollmentService::update(state.repo.as_ref(), &state.grade_scale, id.trim(), dto).await?;
    Ok(Json(enrollment))
}

/// Delete an enrollment
#[utoipa::path(
    delete,
    path = "/api/enrollments/{id}",
    params(("id" = String, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment deleted", body = DeleteOutcome),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Enrollment not found")
    ),
    tag = "Enrollments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let outcome = EnrollmentService::delete(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(outcome))
}
