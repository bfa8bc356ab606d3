use tracing::instrument;

use crate::modules::integrity::{DeleteOutcome, ensure_department, ensure_id_unchanged};
use crate::modules::students::model::{CreateStudentDto, Student, UpdateStudentDto};
use crate::repo::{Repository, StudentFilter};
use crate::utils::errors::AppError;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(repo))]
    pub async fn list(
        repo: &dyn Repository,
        filter: &StudentFilter,
    ) -> Result<Vec<Student>, AppError> {
        Ok(repo.list_students(filter).await?)
    }

    #[instrument(skip(repo))]
    pub async fn get(repo: &dyn Repository, id: &str) -> Result<Student, AppError> {
        repo.find_student(id)
            .await?
            .ok_or_else(|| AppError::not_found("Student not found."))
    }

    #[instrument(skip(repo, dto))]
    pub async fn create(repo: &dyn Repository, dto: CreateStudentDto) -> Result<Student, AppError> {
        let record = dto.into_record();

        ensure_department(repo, &record.major_dept_id, "major_dept_id").await?;

        if repo.find_student(&record.id).await?.is_some() {
            return Err(AppError::conflict("Student with this ID already exists.")
                .with_detail("id", "Choose a different student ID."));
        }
        if repo.student_email_exists(&record.email, None).await? {
            return Err(AppError::conflict("A student with this email already exists.")
                .with_detail("email", "Email already in use."));
        }

        repo.insert_student(&record).await.map_err(|e| match e {
            crate::repo::RepoError::Conflict(_) => {
                AppError::conflict("A student with this email or ID already exists.")
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
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        ensure_id_unchanged(dto.id.as_deref(), id, "Student")?;

        let patch = dto.into_patch();
        if patch.is_empty() {
            return Err(AppError::validation("No changes supplied."));
        }

        if let Some(dept_id) = &patch.major_dept_id {
            ensure_department(repo, dept_id, "major_dept_id").await?;
        }
        if let Some(email) = &patch.email {
            if repo.student_email_exists(email, Some(id)).await? {
                return Err(AppError::conflict("A student with this email already exists.")
                    .with_detail("email", "Email already in use."));
            }
        }

        repo.update_student(id, &patch)
            .await
            .map_err(|e| match e {
                crate::repo::RepoError::Conflict(_) => {
                    AppError::conflict("A student with this email already exists.")
                        .with_detail("email", "Email already in use.")
                }
                other => other.into(),
            })?
            .ok_or_else(|| AppError::not_found("Student not found."))
    }

    /// Deleting a student intentionally leaves their historical enrollments
    /// in place; the count is reported so downstream tooling can react.
    #[instrument(skip(repo))]
    pub async fn delete(repo: &dyn Repository, id: &str) -> Result<DeleteOutcome, AppError> {
        if !repo.delete_student(id).await? {
            return Err(AppError::not_found("Student not found."));
        }

        let outcome =
            DeleteOutcome::new().orphan("enrollments", repo.count_enrollments_by_student(id).await?);
        Ok(outcome)
    }
}
