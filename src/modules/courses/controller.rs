use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AdminUser;
use crate::modules::integrity::DeleteOutcome;
use crate::repo::CourseFilter;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::paging::check_limit;
use crate::validator::ValidatedJson;

use super::model::{Course, CourseListParams, CreateCourseDto, UpdateCourseDto};
use super::service::CourseService;

/// List courses
#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseListParams),
    responses(
        (status = 200, description = "List of courses", body = Vec<Course>),
        (status = 400, description = "Invalid limit"),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseListParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let filter = CourseFilter {
        q: params.q,
        dept_id: params.dept,
        limit: check_limit(params.limit)?,
    };
    let courses = CourseService::list(state.repo.as_ref(), &filter).await?;
    Ok(Json(courses))
}

/// Get a course by ID
#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course details", body = Course),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(course))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Department or prerequisite not found"),
        (status = 409, description = "Course ID already taken")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = CourseService::create(state.repo.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// Update a course
#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Validation failed or empty patch"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course, department or prerequisite not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::update(state.repo.as_ref(), id.trim(), dto).await?;
    Ok(Json(course))
}

/// Delete a course, reporting sections left behind
#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted", body = DeleteOutcome),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course not found")
    ),
    tag = "Courses",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let outcome = CourseService::delete(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(outcome))
}
