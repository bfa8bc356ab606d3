use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::serde::double_option;
use crate::utils::strings::{clean, clean_opt, normalize_semester};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Enrollment {
    pub id: String,
    pub student_id: String,
    pub section_id: String,
    pub semester: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub midterm: Option<f64>,
    #[serde(rename = "final", skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus: Option<f64>,
    /// Derived from the scores; never accepted from a caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
}

/// Enrollment enriched with student and section context for read payloads.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentView {
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub student_name: Option<String>,
    pub course_id: Option<String>,
    pub section_no: Option<String>,
    pub instructor_id: Option<String>,
    pub course_title: Option<String>,
    pub course_dept_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEnrollmentDto {
    /// Defaults to `{student_id}:{section_id}` when omitted.
    pub id: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub student_id: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub section_id: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub semester: String,
    #[validate(range(min = 0.0, max = 10.0, message = "Scores must be between 0 and 10."))]
    pub midterm: Option<f64>,
    #[serde(rename = "final")]
    #[validate(range(min = 0.0, max = 10.0, message = "Scores must be between 0 and 10."))]
    pub final_score: Option<f64>,
    #[validate(range(min = 0.0, max = 10.0, message = "Scores must be between 0 and 10."))]
    pub bonus: Option<f64>,
}

impl CreateEnrollmentDto {
    /// Build the record, without the derived letter; the service computes it.
    pub fn into_record(self) -> Enrollment {
        let student_id = clean(&self.student_id);
        let section_id = clean(&self.section_id);
        let id = clean_opt(self.id).unwrap_or_else(|| format!("{student_id}:{section_id}"));
        Enrollment {
            id,
            student_id,
            section_id,
            semester: normalize_semester(&self.semester),
            midterm: self.midterm,
            final_score: self.final_score,
            bonus: self.bonus,
            letter: None,
        }
    }
}

/// Score fields distinguish "left alone" from "explicit null": sending
/// `"midterm": null` clears the score, omitting the key keeps it.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEnrollmentDto {
    pub id: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub student_id: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub section_id: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub semester: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom(function = "crate::validator::score_patch_in_range"))]
    pub midterm: Option<Option<f64>>,
    #[serde(rename = "final", default, deserialize_with = "double_option")]
    #[validate(custom(function = "crate::validator::score_patch_in_range"))]
    pub final_score: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom(function = "crate::validator::score_patch_in_range"))]
    pub bonus: Option<Option<f64>>,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentPatch {
    pub student_id: Option<String>,
    pub section_id: Option<String>,
    pub semester: Option<String>,
    pub midterm: Option<Option<f64>>,
    pub final_score: Option<Option<f64>>,
    pub bonus: Option<Option<f64>>,
    /// Set by the service on every score-touching update: `Some(Some(_))`
    /// stores the recomputed letter, `Some(None)` clears a stale one.
    pub letter: Option<Option<String>>,
}

impl EnrollmentPatch {
    pub fn is_empty(&self) -> bool {
        self.student_id.is_none()
            && self.section_id.is_none()
            && self.semester.is_none()
            && self.midterm.is_none()
            && self.final_score.is_none()
            && self.bonus.is_none()
            && self.letter.is_none()
    }
}

impl UpdateEnrollmentDto {
    pub fn into_patch(self) -> EnrollmentPatch {
        EnrollmentPatch {
            student_id: self.student_id.map(|v| clean(&v)),
            section_id: self.section_id.map(|v| clean(&v)),
            semester: self.semester.map(|v| normalize_semester(&v)),
            midterm: self.midterm,
            final_score: self.final_score,
            bonus: self.bonus,
            letter: None,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct EnrollmentListParams {
    pub student_id: Option<String>,
    pub section_id: Option<String>,
    pub semester: Option<String>,
    pub limit: Option<i64>,
}
