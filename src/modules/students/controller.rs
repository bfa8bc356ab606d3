use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AdminUser;
use crate::modules::integrity::DeleteOutcome;
use crate::repo::StudentFilter;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::paging::check_limit;
use crate::validator::ValidatedJson;

use super::model::{CreateStudentDto, Student, StudentListParams, UpdateStudentDto};
use super::service::StudentService;

/// List students
#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentListParams),
    responses(
        (status = 200, description = "List of students", body = Vec<Student>),
        (status = 400, description = "Invalid limit"),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn list_students(
    State(state): State<AppState>,
    Query(params): Query<StudentListParams>,
) -> Result<Json<Vec<Student>>, AppError> {
    let filter = StudentFilter {
        q: params.q,
        major_dept_id: params.major,
        limit: check_limit(params.limit)?,
    };
    let students = StudentService::list(state.repo.as_ref(), &filter).await?;
    Ok(Json(students))
}

/// Get a student by ID
#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found")
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::get(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(student))
}

/// Create a student
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Department not found"),
        (status = 409, description = "ID or email already taken")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = StudentService::create(state.repo.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Update a student
#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Validation failed or empty patch"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Student or department not found"),
        (status = 409, description = "Email already taken")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update(state.repo.as_ref(), id.trim(), dto).await?;
    Ok(Json(student))
}

/// Delete a student, reporting enrollments left behind
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = DeleteOutcome),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let outcome = StudentService::delete(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(outcome))
}
