use std::collections::HashMap;

use tracing::instrument;

use crate::modules::courses::model::Course;
use crate::modules::integrity::{
    DeleteOutcome, ensure_course, ensure_id_unchanged, ensure_instructor,
};
use crate::modules::sections::model::{
    ClassSection, CreateSectionDto, SectionView, UpdateSectionDto,
};
use crate::repo::{Repository, SectionFilter};
use crate::utils::errors::AppError;

pub struct SectionService;

impl SectionService {
    #[instrument(skip(repo))]
    pub async fn list(
        repo: &dyn Repository,
        filter: &SectionFilter,
    ) -> Result<Vec<SectionView>, AppError> {
        let sections = repo.list_sections(filter).await?;

        // One course lookup per distinct id, tolerating orphans.
        let mut courses: HashMap<String, Option<Course>> = HashMap::new();
        for section in &sections {
            if !courses.contains_key(&section.course_id) {
                let course = repo.find_course(&section.course_id).await?;
                courses.insert(section.course_id.clone(), course);
            }
        }

        Ok(sections
            .into_iter()
            .map(|section| {
                let course = courses.get(&section.course_id).and_then(|c| c.as_ref());
                view_with(section, course)
            })
            .collect())
    }

    #[instrument(skip(repo))]
    pub async fn get(repo: &dyn Repository, id: &str) -> Result<SectionView, AppError> {
        let section = repo
            .find_section(id)
            .await?
            .ok_or_else(|| AppError::not_found("Section not found."))?;
        Self::build_view(repo, section).await
    }

    #[instrument(skip(repo, dto))]
    pub async fn create(
        repo: &dyn Repository,
        dto: CreateSectionDto,
    ) -> Result<SectionView, AppError> {
        let record = dto.into_record();

        ensure_course(repo, &record.course_id, "course_id").await?;
        ensure_instructor(repo, &record.instructor_id, "instructor_id").await?;

        if repo.find_section(&record.id).await?.is_some() {
            return Err(AppError::conflict("Section with this ID already exists.")
                .with_detail("id", "Choose a different section ID."));
        }
        if repo
            .section_no_exists(&record.course_id, &record.semester, &record.section_no, None)
            .await?
        {
            return Err(AppError::conflict(
                "A section with this number already exists for this course and semester.",
            )
            .with_detail("section_no", "Choose a different section number."));
        }

        repo.insert_section(&record).await.map_err(|e| match e {
            crate::repo::RepoError::Conflict(_) => {
                AppError::conflict("Section with this ID or number already exists.")
                    .with_detail("id", "Choose a different section ID.")
            }
            other => other.into(),
        })?;

        Self::build_view(repo, record).await
    }

    #[instrument(skip(repo, dto))]
    pub async fn update(
        repo: &dyn Repository,
        id: &str,
        dto: UpdateSectionDto,
    ) -> Result<SectionView, AppError> {
        ensure_id_unchanged(dto.id.as_deref(), id, "Section")?;

        let patch = dto.into_patch();
        if patch.is_empty() {
            return Err(AppError::validation("No changes supplied."));
        }

        let existing = repo
            .find_section(id)
            .await?
            .ok_or_else(|| AppError::not_found("Section not found."))?;

        // Only the references actually supplied get re-validated.
        if let Some(course_id) = &patch.course_id {
            ensure_course(repo, course_id, "course_id").await?;
        }
        if let Some(instructor_id) = &patch.instructor_id {
            ensure_instructor(repo, instructor_id, "instructor_id").await?;
        }

        // Re-check the (course, semester, section_no) slot against the merged
        // record, excluding this section itself.
        let course_id = patch.course_id.as_deref().unwrap_or(&existing.course_id);
        let semester = patch.semester.as_deref().unwrap_or(&existing.semester);
        let section_no = patch.section_no.as_deref().unwrap_or(&existing.section_no);
        let slot_changed = course_id != existing.course_id
            || semester != existing.semester
            || section_no != existing.section_no;
        if slot_changed
            && repo
                .section_no_exists(course_id, semester, section_no, Some(id))
                .await?
        {
            return Err(AppError::conflict(
                "A section with this number already exists for this course and semester.",
            )
            .with_detail("section_no", "Choose a different section number."));
        }

        let updated = repo
            .update_section(id, &patch)
            .await
            .map_err(|e| match e {
                crate::repo::RepoError::Conflict(_) => AppError::conflict(
                    "A section with this number already exists for this course and semester.",
                ),
                other => other.into(),
            })?
            .ok_or_else(|| AppError::not_found("Section not found."))?;

        Self::build_view(repo, updated).await
    }

    #[instrument(skip(repo))]
    pub async fn delete(repo: &dyn Repository, id: &str) -> Result<DeleteOutcome, AppError> {
        if !repo.delete_section(id).await? {
            return Err(AppError::not_found("Section not found."));
        }

        let outcome =
            DeleteOutcome::new().orphan("enrollments", repo.count_enrollments_by_section(id).await?);
        Ok(outcome)
    }

    async fn build_view(
        repo: &dyn Repository,
        section: ClassSection,
    ) -> Result<SectionView, AppError> {
        let course = repo.find_course(&section.course_id).await?;
        Ok(view_with(section, course.as_ref()))
    }
}

fn view_with(section: ClassSection, course: Option<&Course>) -> SectionView {
    SectionView {
        course_title: course.map(|c| c.title.clone()),
        course_dept_id: course.map(|c| c.dept_id.clone()),
        course_credits: course.map(|c| c.credits),
        section,
    }
}
