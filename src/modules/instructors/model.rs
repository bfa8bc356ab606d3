use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::strings::{clean, clean_opt, normalize_email};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Instructor {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub dept_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInstructorDto {
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub id: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub full_name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub dept_id: String,
    pub title: Option<String>,
}

impl CreateInstructorDto {
    pub fn into_record(self) -> Instructor {
        Instructor {
            id: clean(&self.id),
            full_name: clean(&self.full_name),
            email: normalize_email(&self.email),
            dept_id: clean(&self.dept_id),
            title: clean_opt(self.title),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInstructorDto {
    pub id: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub full_name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub dept_id: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InstructorPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub dept_id: Option<String>,
    pub title: Option<String>,
}

impl InstructorPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.dept_id.is_none()
            && self.title.is_none()
    }
}

impl UpdateInstructorDto {
    pub fn into_patch(self) -> InstructorPatch {
        InstructorPatch {
            full_name: self.full_name.map(|v| clean(&v)),
            email: self.email.map(|v| normalize_email(&v)),
            dept_id: self.dept_id.map(|v| clean(&v)),
            title: clean_opt(self.title),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct InstructorListParams {
    /// Case-insensitive substring match on full name or email.
    pub q: Option<String>,
    pub dept_id: Option<String>,
    pub limit: Option<i64>,
}
