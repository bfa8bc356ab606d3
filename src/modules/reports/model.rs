use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportParams {
    /// Restrict the report to one semester, e.g. `2024S1`.
    pub semester: Option<String>,
}

/// One enrollment line of the GPA report. `letter` is `null` when the
/// enrollment is ungraded or carries a letter outside the points table.
#[derive(Debug, Serialize, ToSchema)]
pub struct GpaDetail {
    pub course_id: Option<String>,
    pub section_id: String,
    pub credits: f64,
    pub letter: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GpaReport {
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    pub total_credits: f64,
    /// `null` when no graded, credit-bearing enrollment exists.
    pub gpa: Option<f64>,
    pub details: Vec<GpaDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LetterBucket {
    /// `N/A` groups enrollments without a derived letter.
    pub letter: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseStatsReport {
    pub course_id: String,
    pub course_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    pub count: i64,
    pub avg_midterm: Option<f64>,
    pub avg_final: Option<f64>,
    pub distribution: Vec<LetterBucket>,
}

/// A rendered CSV export plus the filename to suggest for download.
#[derive(Debug)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}
