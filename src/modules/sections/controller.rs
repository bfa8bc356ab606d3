use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::middleware::auth::AdminUser;
use crate::modules::integrity::DeleteOutcome;
use crate::repo::SectionFilter;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::paging::check_limit;
use crate::utils::strings::normalize_semester;
use crate::validator::ValidatedJson;

use super::model::{CreateSectionDto, SectionListParams, SectionView, UpdateSectionDto};
use super::service::SectionService;

/// List class sections with their course context
#[utoipa::path(
    get,
    path = "/api/sections",
    params(SectionListParams),
    responses(
        (status = 200, description = "List of sections", body = Vec<SectionView>),
        (status = 400, description = "Invalid limit"),
        (status = 503, description = "Database unavailable")
    ),
    tag = "Sections"
)]
#[instrument(skip(state))]
pub async fn list_sections(
    State(state): State<AppState>,
    Query(params): Query<SectionListParams>,
) -> Result<Json<Vec<SectionView>>, AppError> {
    let filter = SectionFilter {
        course_id: params.course_id,
        semester: params.semester.as_deref().map(normalize_semester),
        instructor_id: params.instructor_id,
        limit: check_limit(params.limit)?,
    };
    let sections = SectionService::list(state.repo.as_ref(), &filter).await?;
    Ok(Json(sections))
}

/// Get a section by ID
#[utoipa::path(
    get,
    path = "/api/sections/{id}",
    params(("id" = String, Path, description = "Section ID")),
    responses(
        (status = 200, description = "Section details", body = SectionView),
        (status = 404, description = "Section not found")
    ),
    tag = "Sections"
)]
#[instrument(skip(state))]
pub async fn get_section(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SectionView>, AppError> {
    let section = SectionService::get(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(section))
}

/// Create a class section
#[utoipa::path(
    post,
    path = "/api/sections",
    request_body = CreateSectionDto,
    responses(
        (status = 201, description = "Section created", body = SectionView),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Course or instructor not found"),
        (status = 409, description = "Section ID or number already taken")
    ),
    tag = "Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_section(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    ValidatedJson(dto): ValidatedJson<CreateSectionDto>,
) -> Result<(StatusCode, Json<SectionView>), AppError> {
    let section = SectionService::create(state.repo.as_ref(), dto).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

/// Update a class section
#[utoipa::path(
    put,
    path = "/api/sections/{id}",
    params(("id" = String, Path, description = "Section ID")),
    request_body = UpdateSectionDto,
    responses(
        (status = 200, description = "Section updated", body = SectionView),
        (status = 400, description = "Validation failed or empty patch"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Section, course or instructor not found"),
        (status = 409, description = "Section number already taken")
    ),
    tag = "Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_section(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateSectionDto>,
) -> Result<Json<SectionView>, AppError> {
    let section = SectionService::update(state.repo.as_ref(), id.trim(), dto).await?;
    Ok(Json(section))
}

/// Delete a section, reporting enrollments left behind
#[utoipa::path(
    delete,
    path = "/api/sections/{id}",
    params(("id" = String, Path, description = "Section ID")),
    responses(
        (status = 200, description = "Section deleted", body = DeleteOutcome),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Section not found")
    ),
    tag = "Sections",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_section(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, AppError> {
    let outcome = SectionService::delete(state.repo.as_ref(), id.trim()).await?;
    Ok(Json(outcome))
}
