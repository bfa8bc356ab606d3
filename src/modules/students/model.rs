use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::strings::{clean, clean_opt, normalize_email};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Student {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub major_dept_id: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub id: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub full_name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub major_dept_id: String,
    pub year: i32,
    pub phone: Option<String>,
}

impl CreateStudentDto {
    pub fn into_record(self) -> Student {
        Student {
            id: clean(&self.id),
            full_name: clean(&self.full_name),
            email: normalize_email(&self.email),
            major_dept_id: clean(&self.major_dept_id),
            year: self.year,
            phone: clean_opt(self.phone),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    pub id: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub full_name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub major_dept_id: Option<String>,
    pub year: Option<i32>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub major_dept_id: Option<String>,
    pub year: Option<i32>,
    pub phone: Option<String>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.major_dept_id.is_none()
            && self.year.is_none()
            && self.phone.is_none()
    }
}

impl UpdateStudentDto {
    pub fn into_patch(self) -> StudentPatch {
        StudentPatch {
            full_name: self.full_name.map(|v| clean(&v)),
            email: self.email.map(|v| normalize_email(&v)),
            major_dept_id: self.major_dept_id.map(|v| clean(&v)),
            year: self.year,
            phone: clean_opt(self.phone),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentListParams {
    /// Case-insensitive substring match on full name or email.
    pub q: Option<String>,
    /// Exact match on the major department.
    pub major: Option<String>,
    pub limit: Option<i64>,
}
