use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::strings::{clean, clean_opt};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub credits: i32,
    pub dept_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub prereq_ids: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub id: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub title: String,
    #[validate(range(min = 1, message = "Credits must be a positive number."))]
    pub credits: i32,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub dept_id: String,
    pub description: Option<String>,
    #[serde(default)]
    pub prereq_ids: Vec<String>,
}

impl CreateCourseDto {
    pub fn into_record(self) -> Course {
        Course {
            id: clean(&self.id),
            title: clean(&self.title),
            credits: self.credits,
            dept_id: clean(&self.dept_id),
            description: clean_opt(self.description),
            prereq_ids: clean_id_list(self.prereq_ids),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    pub id: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub title: Option<String>,
    #[validate(range(min = 1, message = "Credits must be a positive number."))]
    pub credits: Option<i32>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub dept_id: Option<String>,
    pub description: Option<String>,
    pub prereq_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub credits: Option<i32>,
    pub dept_id: Option<String>,
    pub description: Option<String>,
    pub prereq_ids: Option<Vec<String>>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.credits.is_none()
            && self.dept_id.is_none()
            && self.description.is_none()
            && self.prereq_ids.is_none()
    }
}

impl UpdateCourseDto {
    pub fn into_patch(self) -> CoursePatch {
        CoursePatch {
            title: self.title.map(|v| clean(&v)),
            credits: self.credits,
            dept_id: self.dept_id.map(|v| clean(&v)),
            description: clean_opt(self.description),
            prereq_ids: self.prereq_ids.map(clean_id_list),
        }
    }
}

fn clean_id_list(ids: Vec<String>) -> Vec<String> {
    ids.into_iter()
        .map(|id| clean(&id))
        .filter(|id| !id.is_empty())
        .collect()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CourseListParams {
    /// Case-insensitive substring match on title or id.
    pub q: Option<String>,
    pub dept: Option<String>,
    pub limit: Option<i64>,
}
