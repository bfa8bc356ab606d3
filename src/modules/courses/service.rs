use tracing::instrument;

use crate::modules::courses::model::{Course, CreateCourseDto, UpdateCourseDto};
use crate::modules::integrity::{DeleteOutcome, ensure_department, ensure_id_unchanged};
use crate::repo::{CourseFilter, Repository};
use crate::utils::errors::AppError;

pub struct CourseService;

impl CourseService {
    #[instrument(skip(repo))]
    pub async fn list(repo: &dyn Repository, filter: &CourseFilter) -> Result<Vec<Course>, AppError> {
        Ok(repo.list_courses(filter).await?)
    }

    #[instrument(skip(repo))]
    pub async fn get(repo: &dyn Repository, id: &str) -> Result<Course, AppError> {
        repo.find_course(id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found."))
    }

    #[instrument(skip(repo, dto))]
    pub async fn create(repo: &dyn Repository, dto: CreateCourseDto) -> Result<Course, AppError> {
        let record = dto.into_record();

        ensure_department(repo, &record.dept_id, "dept_id").await?;
        Self::check_prereqs(repo, &record.prereq_ids).await?;

        if repo.find_course(&record.id).await?.is_some() {
            return Err(AppError::conflict("Course with this ID already exists.")
                .with_detail("id", "Choose a different course ID."));
        }

        repo.insert_course(&record).await.map_err(|e| match e {
            crate::repo::RepoError::Conflict(_) => {
                AppError::conflict("Course with this ID already exists.")
                    .with_detail("id", "Choose a different course ID.")
            }
            other => other.into(),
        })?;
        Ok(record)
    }

    #[instrument(skip(repo, dto))]
    pub async fn update(
        repo: &dyn Repository,
        id: &str,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        ensure_id_unchanged(dto.id.as_deref(), id, "Course")?;

        let patch = dto.into_patch();
        if patch.is_empty() {
            return Err(AppError::validation("No changes supplied."));
        }

        if let Some(dept_id) = &patch.dept_id {
            ensure_department(repo, dept_id, "dept_id").await?;
        }
        if let Some(prereq_ids) = &patch.prereq_ids {
            Self::check_prereqs(repo, prereq_ids).await?;
        }

        repo.update_course(id, &patch)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found."))
    }

    #[instrument(skip(repo))]
    pub async fn delete(repo: &dyn Repository, id: &str) -> Result<DeleteOutcome, AppError> {
        if !repo.delete_course(id).await? {
            return Err(AppError::not_found("Course not found."));
        }

        let outcome =
            DeleteOutcome::new().orphan("sections", repo.count_sections_by_course(id).await?);
        Ok(outcome)
    }

    async fn check_prereqs(repo: &dyn Repository, prereq_ids: &[String]) -> Result<(), AppError> {
        for prereq_id in prereq_ids {
            if repo.find_course(prereq_id).await?.is_none() {
                return Err(AppError::not_found("Prerequisite course not found.").with_detail(
                    "prereq_ids",
                    &format!("Course {prereq_id} does not exist."),
                ));
            }
        }
        Ok(())
    }
}
