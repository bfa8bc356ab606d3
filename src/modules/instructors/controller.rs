use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AdminUser;
use crate::modules::integrity::DeleteOutcome;
use crate::repo::InstructorFilter;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::paging::check_limit;
use crate::validator::ValidatedJson;

use super::model::{CreateInstructorDto, Instructor, InstructorListParams, UpdateInstructorDto};
use super::service::InstructorService;

/// List instructors
#[utoipa::path(
    get,
    path = "/api/instructors",
    params(InstructorListParams),
    responses(
        (status = 200, description = "List of instructors", body = Vec<Instructor>),
        (status = 400, description = "Invalid limit"),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Instructors"
)]
#[instrument(skip(state))]
pub async fn list_instructors(
    State(state): State<AppState>,
    Query(params): Query<InstructorListParams>,
) -> Result<Json<Vec<Instructor>>, AppError> {
    let filter = InstructorFilter {
        q: params.q,
        dept_id: params.dept_id,
        limit: check_limit(params.limit)?,
    };
    let instructors = InstructorService::list(state.repo.as_ref(), &filter).await?;
    Ok(Json(instructors))
}

/// Get an instructor by ID
#[utoipa::path(
    get,
    path = "/api/instructors/{id}",
    params(("id" = String, Path, description = "Instructor ID")),
    responses(
        (status = 200, description = "Instructor details", body = Instructor),
        (status = 404, description = "Instructor not found")
    ),
    tag = "Instructors"
)]
#[instrument(skip(state))]
pub async fn get_instructor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Instructor>, AppError> {
    let instructor = InstructorService::get(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(instructor))
}

/// Create an instructor
#[utoipa::path(
    post,
    path = "/api/instructors",
    request_body = CreateInstructorDto,
    responses(
        (status = 201, description = "Instructor created", body = Instructor),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Department not found"),
        (status = 409, description = "ID or email already taken")
    ),
    tag = "Instructors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_instructor(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    ValidatedJson(dto): ValidatedJson<CreateInstructorDto>,
) -> Result<(StatusCode, Json<Instructor>), AppError> {
    let instructor = InstructorService::create(state.repo.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(instructor)))
}

/// Update an instructor
#[utoipa::path(
    put,
    path = "/api/instructors/{id}",
    params(("id" = String, Path, description = "Instructor ID")),
    request_body = UpdateInstructorDto,
    responses(
        (status = 200, description = "Instructor updated", body = Instructor),
        (status = 400, description = "Validation failed or empty patch"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Instructor or department not found"),
        (status = 409, description = "Email already taken")
    ),
    tag = "Instructors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_instructor(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateInstructorDto>,
) -> Result<Json<Instructor>, AppError> {
    let instructor = InstructorService::update(state.repo.as_ref(), id.trim(), dto).await?;
    Ok(Json(instructor))
}

/// Delete an instructor, reporting dependents left behind
#[utoipa::path(
    delete,
    path = "/api/instructors/{id}",
    params(("id" = String, Path, description = "Instructor ID")),
    responses(
        (status = 200, description = "Instructor deleted", body = DeleteOutcome),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Instructor not found")
    ),
    tag = "Instructors",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_instructor(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let outcome = InstructorService::delete(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(outcome))
}
