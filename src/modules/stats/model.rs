use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsTotals {
    pub departments: i64,
    pub instructors: i64,
    pub students: i64,
    pub courses: i64,
    pub sections: i64,
    pub enrollments: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MajorCount {
    pub major_dept_id: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SemesterCount {
    pub semester: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LetterCount {
    pub letter: String,
    pub count: i64,
}

/// Average of the derived raw score over graded enrollments of one section.
#[derive(Debug, Serialize, ToSchema)]
pub struct SectionAverage {
    pub section_id: String,
    pub count: i64,
    pub avg_score: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseAverage {
    pub course_id: String,
    pub count: i64,
    pub avg_score: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseEnrollmentCount {
    pub course_id: String,
    /// Falls back to the course id when the course record is an orphan.
    pub title: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub totals: StatsTotals,
    pub students_by_major: Vec<MajorCount>,
    pub enrollments_by_semester: Vec<SemesterCount>,
    pub grade_distribution: Vec<LetterCount>,
    pub avg_score_by_section: Vec<SectionAverage>,
    pub avg_score_by_course: Vec<CourseAverage>,
    pub top_courses_by_enrollment: Vec<CourseEnrollmentCount>,
}
