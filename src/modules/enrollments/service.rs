use std::collections::HashMap;

use tracing::instrument;

use crate::grading::{GradeScale, compute_grade};
use crate::modules::courses::model::Course;
use crate::modules::enrollments::model::{
    CreateEnrollmentDto, Enrollment, EnrollmentView, UpdateEnrollmentDto,
};
use crate::modules::integrity::{
    DeleteOutcome, ensure_id_unchanged, ensure_section, ensure_student,
};
use crate::modules::sections::model::ClassSection;
use crate::modules::students::model::Student;
use crate::repo::{EnrollmentFilter, Repository};
use crate::utils::errors::AppError;

pub struct EnrollmentService;

impl EnrollmentService {
    #[instrument(skip(repo))]
    pub async fn list(
        repo: &dyn Repository,
        filter: &EnrollmentFilter,
    ) -> Result<Vec<EnrollmentView>, AppError> {
        let enrollments = repo.list_enrollments(filter).await?;

        let mut students: HashMap<String, Option<Student>> = HashMap::new();
        let mut sections: HashMap<String, Option<ClassSection>> = HashMap::new();
        let mut courses: HashMap<String, Option<Course>> = HashMap::new();

        let mut views = Vec::with_capacity(enrollments.len());
        for enrollment in enrollments {
            if !students.contains_key(&enrollment.student_id) {
                let student = repo.find_student(&enrollment.student_id).await?;
                students.insert(enrollment.student_id.clone(), student);
            }
            if !sections.contains_key(&enrollment.section_id) {
                let section = repo.find_section(&enrollment.section_id).await?;
                sections.insert(enrollment.section_id.clone(), section);
            }
            let section = sections
                .get(&enrollment.section_id)
                .and_then(|s| s.as_ref());
            if let Some(section) = section {
                if !courses.contains_key(&section.course_id) {
                    let course = repo.find_course(&section.course_id).await?;
                    courses.insert(section.course_id.clone(), course);
                }
            }

            let student = students
                .get(&enrollment.student_id)
                .and_then(|s| s.as_ref());
            let course = section
                .and_then(|s| courses.get(&s.course_id))
                .and_then(|c| c.as_ref());
            views.push(view_with(enrollment, student, section, course));
        }
        Ok(views)
    }

    #[instrument(skip(repo))]
    pub async fn get(repo: &dyn Repository, id: &str) -> Result<EnrollmentView, AppError> {
        let enrollment = repo
            .find_enrollment(id)
            .await?
            .ok_or_else(|| AppError::not_found("Enrollment not found."))?;
        Self::build_view(repo, enrollment).await
    }

    #[instrument(skip(repo, scale, dto))]
    pub async fn create(
        repo: &dyn Repository,
        scale: &GradeScale,
        dto: CreateEnrollmentDto,
    ) -> Result<EnrollmentView, AppError> {
        let mut record = dto.into_record();

        ensure_student(repo, &record.student_id, "student_id").await?;
        ensure_section(repo, &record.section_id, "section_id").await?;

        if repo.find_enrollment(&record.id).await?.is_some() {
            return Err(AppError::conflict("Enrollment with this ID already exists.")
                .with_detail("id", "Choose a different enrollment ID."));
        }
        if repo
            .find_enrollment_by_pair(&record.student_id, &record.section_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Enrollment already exists for this student and section.",
            ));
        }

        record.letter =
            compute_grade(scale, record.midterm, record.final_score, record.bonus).map(|g| g.letter);

        repo.insert_enrollment(&record).await.map_err(|e| match e {
            crate::repo::RepoError::Conflict(_) => {
                AppError::conflict("Enrollment already exists for this student and section.")
            }
            other => other.into(),
        })?;

        Self::build_view(repo, record).await
    }

    #[instrument(skip(repo, scale, dto))]
    pub async fn update(
        repo: &dyn Repository,
        scale: &GradeScale,
        id: &str,
        dto: UpdateEnrollmentDto,
    ) -> Result<EnrollmentView, AppError> {
        ensure_id_unchanged(dto.id.as_deref(), id, "Enrollment")?;

        let mut patch = dto.into_patch();
        if patch.is_empty() {
            return Err(AppError::validation("No changes supplied."));
        }

        let existing = repo
            .find_enrollment(id)
            .await?
            .ok_or_else(|| AppError::not_found("Enrollment not found."))?;

        if let Some(student_id) = &patch.student_id {
            ensure_student(repo, student_id, "student_id").await?;
        }
        if let Some(section_id) = &patch.section_id {
            ensure_section(repo, section_id, "section_id").await?;
        }

        // Moving the enrollment to a different (student, section) pair must
        // not collide with an existing one.
        let student_id = patch.student_id.as_deref().unwrap_or(&existing.student_id);
        let section_id = patch.section_id.as_deref().unwrap_or(&existing.section_id);
        let pair_changed =
            student_id != existing.student_id || section_id != existing.section_id;
        if pair_changed {
            if let Some(other) = repo.find_enrollment_by_pair(student_id, section_id).await? {
                if other.id != id {
                    return Err(AppError::conflict(
                        "Enrollment already exists for this student and section.",
                    ));
                }
            }
        }

        // Any score change recomputes the letter over the merged scores;
        // clearing the last score clears the letter too.
        let scores_touched =
            patch.midterm.is_some() || patch.final_score.is_some() || patch.bonus.is_some();
        if scores_touched {
            let midterm = match patch.midterm {
                Some(v) => v,
                None => existing.midterm,
            };
            let final_score = match patch.final_score {
                Some(v) => v,
                None => existing.final_score,
            };
            let bonus = match patch.bonus {
                Some(v) => v,
                None => existing.bonus,
            };
            patch.letter =
                Some(compute_grade(scale, midterm, final_score, bonus).map(|g| g.letter));
        }

        let updated = repo
            .update_enrollment(id, &patch)
            .await
            .map_err(|e| match e {
                crate::repo::RepoError::Conflict(_) => AppError::conflict(
                    "Enrollment already exists for this student and section.",
                ),
                other => other.into(),
            })?
            .ok_or_else(|| AppError::not_found("Enrollment not found."))?;

        Self::build_view(repo, updated).await
    }

    #[instrument(skip(repo))]
    pub async fn delete(repo: &dyn Repository, id: &str) -> Result<DeleteOutcome, AppError> {
        if !repo.delete_enrollment(id).await? {
            return Err(AppError::not_found("Enrollment not found."));
        }
        Ok(DeleteOutcome::new())
    }

    async fn build_view(
        repo: &dyn Repository,
        enrollment: Enrollment,
    ) -> Result<EnrollmentView, AppError> {
        let student = repo.find_student(&enrollment.student_id).await?;
        let section = repo.find_section(&enrollment.section_id).await?;
        let course = match &section {
            Some(section) => repo.find_course(&section.course_id).await?,
            None => None,
        };
        Ok(view_with(
            enrollment,
            student.as_ref(),
            section.as_ref(),
            course.as_ref(),
        ))
    }
}

fn view_with(
    enrollment: Enrollment,
    student: Option<&Student>,
    section: Option<&ClassSection>,
    course: Option<&Course>,
) -> EnrollmentView {
    EnrollmentView {
        student_name: student.map(|s| s.full_name.clone()),
        course_id: section.map(|s| s.course_id.clone()),
        section_no: section.map(|s| s.section_no.clone()),
        instructor_id: section.map(|s| s.instructor_id.clone()),
        course_title: course.map(|c| c.title.clone()),
        course_dept_id: course.map(|c| c.dept_id.clone()),
        enrollment,
    }
}
