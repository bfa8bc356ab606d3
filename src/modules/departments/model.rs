use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::strings::{clean, clean_opt};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentDto {
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub id: String,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub name: String,
    pub office: Option<String>,
    pub phone: Option<String>,
}

impl CreateDepartmentDto {
    pub fn into_record(self) -> Department {
        Department {
            id: clean(&self.id),
            name: clean(&self.name),
            office: clean_opt(self.office),
            phone: clean_opt(self.phone),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentDto {
    pub id: Option<String>,
    #[validate(custom(function = "crate::validator::not_blank"))]
    pub name: Option<String>,
    pub office: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DepartmentPatch {
    pub name: Option<String>,
    pub office: Option<String>,
    pub phone: Option<String>,
}

impl DepartmentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.office.is_none() && self.phone.is_none()
    }
}

impl UpdateDepartmentDto {
    pub fn into_patch(self) -> DepartmentPatch {
        DepartmentPatch {
            name: self.name.map(|v| clean(&v)),
            office: clean_opt(self.office),
            phone: clean_opt(self.phone),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DepartmentListParams {
    /// Case-insensitive substring match on name or id.
    pub q: Option<String>,
    pub limit: Option<i64>,
}
