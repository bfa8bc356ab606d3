use tracing::instrument;

use crate::modules::departments::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};
use crate::modules::integrity::{DeleteOutcome, ensure_id_unchanged};
use crate::repo::{DepartmentFilter, Repository};
use crate::utils::errors::AppError;

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(repo))]
    pub async fn list(
        repo: &dyn Repository,
        filter: &DepartmentFilter,
    ) -> Result<Vec<Department>, AppError> {
        Ok(repo.list_departments(filter).await?)
    }

    #[instrument(skip(repo))]
    pub async fn get(repo: &dyn Repository, id: &str) -> Result<Department, AppError> {
        repo.find_department(id)
            .await?
            .ok_or_else(|| AppError::not_found("Department not found."))
    }

    #[instrument(skip(repo, dto))]
    pub async fn create(
        repo: &dyn Repository,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        let record = dto.into_record();

        if repo.find_department(&record.id).await?.is_some() {
            return Err(AppError::conflict("Department with this ID already exists.")
                .with_detail("id", "Choose a different department ID."));
        }

        repo.insert_department(&record).await?;
        Ok(record)
    }

    #[instrument(skip(repo, dto))]
    pub async fn update(
        repo: &dyn Repository,
        id: &str,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        ensure_id_unchanged(dto.id.as_deref(), id, "Department")?;

        let patch = dto.into_patch();
        if patch.is_empty() {
            return Err(AppError::validation("No changes supplied."));
        }

        repo.update_department(id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found("Department not found."))
    }

    #[instrument(skip(repo))]
    pub async fn delete(repo: &dyn Repository, id: &str) -> Result<DeleteOutcome, AppError> {
        if !repo.delete_department(id).await? {
            return Err(AppError::not_found("Department not found."));
        }

        let outcome = DeleteOutcome::new()
            .orphan("courses", repo.count_courses_by_dept(id).await?)
            .orphan("instructors", repo.count_instructors_by_dept(id).await?)
            .orphan("students", repo.count_students_by_major(id).await?);
        Ok(outcome)
    }
}
