use std::collections::{BTreeMap, HashMap};

use tracing::instrument;

use crate::grading::{GradeScale, compute_grade, letter_order};
use crate::modules::stats::model::{
    CourseAverage, CourseEnrollmentCount, LetterCount, MajorCount, SectionAverage, SemesterCount,
    StatsResponse, StatsTotals,
};
use crate::repo::{EnrollmentFilter, Repository, SCAN_LIMIT, SectionFilter, StudentFilter};
use crate::utils::errors::AppError;

pub struct StatsService;

impl StatsService {
    /// Aggregates are computed over plain collection scans; the response is
    /// not an atomic snapshot across collections.
    #[instrument(skip(repo, scale))]
    pub async fn collect(
        repo: &dyn Repository,
        scale: &GradeScale,
    ) -> Result<StatsResponse, AppError> {
        let totals = StatsTotals {
            departments: repo.count_departments().await?,
            instructors: repo.count_instructors().await?,
            students: repo.count_students().await?,
            courses: repo.count_courses().await?,
            sections: repo.count_sections().await?,
            enrollments: repo.count_enrollments().await?,
        };

        let students = repo
            .list_students(&StudentFilter {
                limit: Some(SCAN_LIMIT),
                ..Default::default()
            })
            .await?;
        let mut by_major: BTreeMap<String, i64> = BTreeMap::new();
        for student in &students {
            *by_major.entry(student.major_dept_id.clone()).or_default() += 1;
        }
        let mut students_by_major: Vec<MajorCount> = by_major
            .into_iter()
            .map(|(major_dept_id, count)| MajorCount {
                major_dept_id,
                count,
            })
            .collect();
        students_by_major
            .sort_by(|a, b| b.count.cmp(&a.count).then(a.major_dept_id.cmp(&b.major_dept_id)));

        let enrollments = repo
            .list_enrollments(&EnrollmentFilter {
                limit: Some(SCAN_LIMIT),
                ..Default::default()
            })
            .await?;

        let mut by_semester: BTreeMap<String, i64> = BTreeMap::new();
        let mut by_letter: HashMap<String, i64> = HashMap::new();
        for enrollment in &enrollments {
            *by_semester.entry(enrollment.semester.clone()).or_default() += 1;
            if let Some(letter) = &enrollment.letter {
                *by_letter.entry(letter.clone()).or_default() += 1;
            }
        }
        let enrollments_by_semester = by_semester
            .into_iter()
            .map(|(semester, count)| SemesterCount { semester, count })
            .collect();
        let mut grade_distribution: Vec<LetterCount> = by_letter
            .into_iter()
            .map(|(letter, count)| LetterCount { letter, count })
            .collect();
        grade_distribution.sort_by_key(|entry| letter_order(&entry.letter));

        // Ungraded enrollments are excluded from averages rather than
        // dragging them down as zeros.
        let mut by_section: BTreeMap<String, (i64, f64)> = BTreeMap::new();
        for enrollment in &enrollments {
            let Some(grade) =
                compute_grade(scale, enrollment.midterm, enrollment.final_score, enrollment.bonus)
            else {
                continue;
            };
            let slot = by_section.entry(enrollment.section_id.clone()).or_insert((0, 0.0));
            slot.0 += 1;
            slot.1 += grade.raw;
        }

        let sections = repo
            .list_sections(&SectionFilter {
                limit: Some(SCAN_LIMIT),
                ..Default::default()
            })
            .await?;
        let section_course: HashMap<&str, &str> = sections
            .iter()
            .map(|s| (s.id.as_str(), s.course_id.as_str()))
            .collect();

        let mut by_course: BTreeMap<String, (i64, f64)> = BTreeMap::new();
        for (section_id, (count, sum)) in &by_section {
            if let Some(course_id) = section_course.get(section_id.as_str()) {
                let slot = by_course.entry((*course_id).to_string()).or_insert((0, 0.0));
                slot.0 += count;
                slot.1 += sum;
            }
        }

        let avg_score_by_section = by_section
            .into_iter()
            .map(|(section_id, (count, sum))| SectionAverage {
                section_id,
                count,
                avg_score: round2(sum / count as f64),
            })
            .collect();
        let avg_score_by_course = by_course
            .into_iter()
            .map(|(course_id, (count, sum))| CourseAverage {
                course_id,
                count,
                avg_score: round2(sum / count as f64),
            })
            .collect();

        let mut enrollments_per_course: BTreeMap<String, i64> = BTreeMap::new();
        for enrollment in &enrollments {
            if let Some(course_id) = section_course.get(enrollment.section_id.as_str()) {
                *enrollments_per_course.entry((*course_id).to_string()).or_default() += 1;
            }
        }
        let mut top: Vec<(String, i64)> = enrollments_per_course.into_iter().collect();
        top.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        top.truncate(5);

        let mut top_courses_by_enrollment = Vec::with_capacity(top.len());
        for (course_id, count) in top {
            let title = repo
                .find_course(&course_id)
                .await?
                .map(|c| c.title)
                .unwrap_or_else(|| course_id.clone());
            top_courses_by_enrollment.push(CourseEnrollmentCount {
                course_id,
                title,
                count,
            });
        }

        Ok(StatsResponse {
            totals,
            students_by_major,
            enrollments_by_semester,
            grade_distribution,
            avg_score_by_section,
            avg_score_by_course,
            top_courses_by_enrollment,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
