use std::collections::HashMap;

use anyhow::Context;
use tracing::instrument;

use crate::grading::{grade_points, letter_order};
use crate::modules::courses::model::Course;
use crate::modules::reports::model::{
    CourseStatsReport, CsvExport, GpaDetail, GpaReport, LetterBucket,
};
use crate::modules::sections::model::ClassSection;
use crate::repo::{EnrollmentFilter, Repository, SCAN_LIMIT, SectionFilter};
use crate::utils::errors::AppError;
use crate::utils::strings::normalize_semester;

pub struct ReportService;

impl ReportService {
    /// GPA over graded enrollments, weighted by course credits. Enrollments
    /// whose section or course reference is an orphan contribute a detail
    /// line with zero credits but never affect the GPA.
    #[instrument(skip(repo))]
    pub async fn student_gpa(
        repo: &dyn Repository,
        student_id: &str,
        semester: Option<&str>,
    ) -> Result<GpaReport, AppError> {
        if repo.find_student(student_id).await?.is_none() {
            return Err(AppError::not_found("Student not found."));
        }
        let semester = semester.map(normalize_semester);

        let enrollments = repo
            .list_enrollments(&EnrollmentFilter {
                student_id: Some(student_id.to_string()),
                semester: semester.clone(),
                limit: Some(SCAN_LIMIT),
                ..Default::default()
            })
            .await?;

        let mut sections: HashMap<String, Option<ClassSection>> = HashMap::new();
        let mut courses: HashMap<String, Option<Course>> = HashMap::new();

        let mut details = Vec::with_capacity(enrollments.len());
        let mut quality_points = 0.0;
        let mut total_credits = 0.0;

        for enrollment in enrollments {
            if !sections.contains_key(&enrollment.section_id) {
                let section = repo.find_section(&enrollment.section_id).await?;
                sections.insert(enrollment.section_id.clone(), section);
            }
            let section = sections
                .get(&enrollment.section_id)
                .and_then(|s| s.as_ref());

            let course = match section {
                Some(section) => {
                    if !courses.contains_key(&section.course_id) {
                        let course = repo.find_course(&section.course_id).await?;
                        courses.insert(section.course_id.clone(), course);
                    }
                    courses.get(&section.course_id).and_then(|c| c.as_ref())
                }
                None => None,
            };

            let credits = course.map(|c| f64::from(c.credits).max(0.0)).unwrap_or(0.0);
            let letter = enrollment
                .letter
                .as_deref()
                .map(|l| l.trim().to_ascii_uppercase())
                .filter(|l| grade_points(l).is_some());

            if let Some(letter) = &letter {
                if credits > 0.0 {
                    total_credits += credits;
                    quality_points += grade_points(letter).unwrap_or(0.0) * credits;
                }
            }

            details.push(GpaDetail {
                course_id: section.map(|s| s.course_id.clone()),
                section_id: enrollment.section_id,
                credits,
                letter,
            });
        }

        details.sort_by(|a, b| {
            (a.course_id.as_deref().unwrap_or(""), &a.section_id)
                .cmp(&(b.course_id.as_deref().unwrap_or(""), &b.section_id))
        });

        let gpa = (total_credits > 0.0).then(|| round2(quality_points / total_credits));

        Ok(GpaReport {
            student_id: student_id.to_string(),
            semester,
            total_credits,
            gpa,
            details,
        })
    }

    #[instrument(skip(repo))]
    pub async fn course_stats(
        repo: &dyn Repository,
        course_id: &str,
        semester: Option<&str>,
    ) -> Result<CourseStatsReport, AppError> {
        let course = repo
            .find_course(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found."))?;
        let semester = semester.map(normalize_semester);

        let sections = repo
            .list_sections(&SectionFilter {
                course_id: Some(course_id.to_string()),
                semester: semester.clone(),
                ..Default::default()
            })
            .await?;

        let mut count = 0i64;
        let mut midterm_sum = 0.0;
        let mut midterm_n = 0i64;
        let mut final_sum = 0.0;
        let mut final_n = 0i64;
        let mut buckets: HashMap<String, i64> = HashMap::new();

        for section in &sections {
            let enrollments = repo
                .list_enrollments(&EnrollmentFilter {
                    section_id: Some(section.id.clone()),
                    semester: semester.clone(),
                    limit: Some(SCAN_LIMIT),
                    ..Default::default()
                })
                .await?;
            for enrollment in enrollments {
                count += 1;
                if let Some(midterm) = enrollment.midterm {
                    midterm_sum += midterm;
                    midterm_n += 1;
                }
                if let Some(final_score) = enrollment.final_score {
                    final_sum += final_score;
                    final_n += 1;
                }
                let letter = enrollment
                    .letter
                    .map(|l| l.trim().to_ascii_uppercase())
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| "N/A".to_string());
                *buckets.entry(letter).or_default() += 1;
            }
        }

        let mut distribution: Vec<LetterBucket> = buckets
            .into_iter()
            .map(|(letter, count)| LetterBucket { letter, count })
            .collect();
        // Best letter first, the ungraded bucket last.
        distribution.sort_by_key(|bucket| {
            if bucket.letter == "N/A" {
                usize::MAX
            } else {
                letter_order(&bucket.letter)
            }
        });

        Ok(CourseStatsReport {
            course_id: course_id.to_string(),
            course_title: Some(course.title),
            semester,
            count,
            avg_midterm: (midterm_n > 0).then(|| round2(midterm_sum / midterm_n as f64)),
            avg_final: (final_n > 0).then(|| round2(final_sum / final_n as f64)),
            distribution,
        })
    }

    /// Flat CSV of every enrollment, joined with its section for the course
    /// id. Missing scores render as empty cells.
    #[instrument(skip(repo))]
    pub async fn enrollments_csv(
        repo: &dyn Repository,
        semester: Option<&str>,
    ) -> Result<CsvExport, AppError> {
        let semester = semester.map(normalize_semester);

        let enrollments = repo
            .list_enrollments(&EnrollmentFilter {
                semester: semester.clone(),
                limit: Some(SCAN_LIMIT),
                ..Default::default()
            })
            .await?;

        let mut sections: HashMap<String, Option<ClassSection>> = HashMap::new();

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "student_id",
                "section_id",
                "course_id",
                "semester",
                "midterm",
                "final",
                "bonus",
                "letter",
            ])
            .context("write csv header")
            .map_err(AppError::internal)?;

        for enrollment in enrollments {
            if !sections.contains_key(&enrollment.section_id) {
                let section = repo.find_section(&enrollment.section_id).await?;
                sections.insert(enrollment.section_id.clone(), section);
            }
            let course_id = sections
                .get(&enrollment.section_id)
                .and_then(|s| s.as_ref())
                .map(|s| s.course_id.as_str())
                .unwrap_or("");

            writer
                .write_record([
                    enrollment.student_id.as_str(),
                    enrollment.section_id.as_str(),
                    course_id,
                    enrollment.semester.as_str(),
                    &score_cell(enrollment.midterm),
                    &score_cell(enrollment.final_score),
                    &score_cell(enrollment.bonus),
                    enrollment.letter.as_deref().unwrap_or(""),
                ])
                .context("write csv row")
                .map_err(AppError::internal)?;
        }

        let bytes = writer
            .into_inner()
            .context("flush csv writer")
            .map_err(AppError::internal)?;
        let content = String::from_utf8(bytes)
            .context("csv output was not utf-8")
            .map_err(AppError::internal)?;

        let filename = match &semester {
            Some(semester) => format!("enrollments_{semester}.csv"),
            None => "enrollments.csv".to_string(),
        };

        Ok(CsvExport { filename, content })
    }
}

fn score_cell(score: Option<f64>) -> String {
    score.map(|v| v.to_string()).unwrap_or_default()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
