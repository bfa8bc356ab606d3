use tracing::instrument;

use crate::modules::instructors::model::{CreateInstructorDto, Instructor, UpdateInstructorDto};
use crate::modules::integrity::{DeleteOutcome, ensure_department, ensure_id_unchanged};
use crate::repo::{InstructorFilter, Repository};
use crate::utils::errors::AppError;

pub struct InstructorService;

impl InstructorService {
    #[instrument(skip(repo))]
    pub async fn list(
        repo: &dyn Repository,
        filter: &InstructorFilter,
    ) -> Result<Vec<Instructor>, AppError> {
        Ok(repo.list_instructors(filter).await?)
    }

    #[instrument(skip(repo))]
    pub async fn get(repo: &dyn Repository, id: &str) -> Result<Instructor, AppError> {
        repo.find_instructor(id)
            .await?
            .ok_or_else(|| AppError::not_found("Instructor not found."))
    }

    #[instrument(skip(repo, dto))]
    pub async fn create(
        repo: &dyn Repository,
        dto: CreateInstructorDto,
    ) -> Result<Instructor, AppError> {
        let record = dto.into_record();

        ensure_department(repo, &record.dept_id, "dept_id").await?;

        if repo.find_instructor(&record.id).await?.is_some() {
            return Err(AppError::conflict("Instructor with this ID already exists.")
                .with_detail("id", "Choose a different instructor ID."));
        }
        if repo.instructor_email_exists(&record.email, None).await? {
            return Err(
                AppError::conflict("An instructor with this email already exists.")
                    .with_detail("email", "Email already in use."),
            );
        }

        repo.insert_instructor(&record).await.map_err(|e| match e {
            crate::repo::RepoError::Conflict(_) => {
                AppError::conflict("An instructor with this email or ID already exists.")
                    .with_detail("email", "Email already in use.")
            }
            other => other.into(),
        })?;
        Ok(record)
    }

    #[instrument(skip(repo, dto))]
    pub async fn update(
        repo: &dyn Repository,
        id: &str,
        dto: UpdateInstructorDto,
    ) -> Result<Instructor, AppError> {
        ensure_id_unchanged(dto.id.as_deref(), id, "Instructor")?;

        let patch = dto.into_patch();
        if patch.is_empty() {
            return Err(AppError::validation("No changes supplied."));
        }

        if let Some(dept_id) = &patch.dept_id {
            ensure_department(repo, dept_id, "dept_id").await?;
        }
        if let Some(email) = &patch.email {
            if repo.instructor_email_exists(email, Some(id)).await? {
                return Err(
                    AppError::conflict("An instructor with this email already exists.")
                        .with_detail("email", "Email already in use."),
                );
            }
        }

        repo.update_instructor(id, &patch)
            .await
            .map_err(|e| match e {
                crate::repo::RepoError::Conflict(_) => {
                    AppError::conflict("An instructor with this email already exists.")
                        .with_detail("email", "Email already in use.")
                }
                other => other.into(),
            })?
            .ok_or_else(|| AppError::not_found("Instructor not found."))
    }

    #[instrument(skip(repo))]
    pub async fn delete(repo: &dyn Repository, id: &str) -> Result<DeleteOutcome, AppError> {
        if !repo.delete_instructor(id).await? {
            return Err(AppError::not_found("Instructor not found."));
        }

        let outcome =
            DeleteOutcome::new().orphan("sections", repo.count_sections_by_instructor(id).await?);
        Ok(outcome)
    }
}
