use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AdminUser;
use crate::modules::integrity::DeleteOutcome;
use crate::repo::DepartmentFilter;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::paging::check_limit;
use crate::validator::ValidatedJson;

use super::model::{CreateDepartmentDto, Department, DepartmentListParams, UpdateDepartmentDto};
use super::service::DepartmentService;

/// List departments
#[utoipa::path(
    get,
    path = "/api/departments",
    params(DepartmentListParams),
    responses(
        (status = 200, description = "List of departments", body = Vec<Department>),
        (status = 400, description = "Invalid limit"),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Departments"
)]
#[instrument(skip(state))]
pub async fn list_departments(
    State(state): State<AppState>,
    Query(params): Query<DepartmentListParams>,
) -> Result<Json<Vec<Department>>, AppError> {
    let filter = DepartmentFilter {
        q: params.q,
        limit: check_limit(params.limit)?,
    };
    let departments = DepartmentService::list(state.repo.as_ref(), &filter).await?;
    Ok(Json(departments))
}

/// Get a department by ID
#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    params(("id" = String, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department details", body = Department),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments"
)]
#[instrument(skip(state))]
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::get(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(department))
}

/// Create a department
#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartmentDto,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Department ID already taken")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_department(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    let department = DepartmentService::create(state.repo.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// Update a department
#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    params(("id" = String, Path, description = "Department ID")),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 400, description = "Validation failed or empty patch"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_department(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::update(state.repo.as_ref(), id.trim(), dto).await?;
    Ok(Json(department))
}

/// Delete a department, reporting dependents left behind
#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    params(("id" = String, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted", body = DeleteOutcome),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_department(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let outcome = DepartmentService::delete(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(outcome))
}
