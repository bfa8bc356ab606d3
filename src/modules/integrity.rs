//! Reference-existence checks shared by every mutating service, and the
//! delete outcome shape.
//!
//! Deletes never cascade: dependents are left in place as orphans and the
//! response reports how many there are, so reconciliation tooling can react.
//! These pre-checks give friendly errors; uniqueness under concurrency is
//! guaranteed by the repository, not here.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::repo::Repository;
use crate::utils::errors::AppError;

/// Response body of every delete endpoint: `orphaned` maps each dependent
/// collection to the number of records still referencing the deleted id.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteOutcome {
    pub deleted: bool,
    pub orphaned: BTreeMap<&'static str, i64>,
}

impl DeleteOutcome {
    pub fn new() -> Self {
        Self {
            deleted: true,
            orphaned: BTreeMap::new(),
        }
    }

    pub fn orphan(mut self, collection: &'static str, count: i64) -> Self {
        self.orphaned.insert(collection, count);
        self
    }
}

impl Default for DeleteOutcome {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn ensure_department(
    repo: &dyn Repository,
    id: &str,
    field: &str,
) -> Result<(), AppError> {
    if repo.find_department(id).await?.is_none() {
        return Err(AppError::not_found("Department not found.")
            .with_detail(field, "Select an existing department."));
    }
    Ok(())
}

pub async fn ensure_instructor(
    repo: &dyn Repository,
    id: &str,
    field: &str,
) -> Result<(), AppError> {
    if repo.find_instructor(id).await?.is_none() {
        return Err(AppError::not_found("Instructor not found.")
            .with_detail(field, "Select an existing instructor."));
    }
    Ok(())
}

pub async fn ensure_student(repo: &dyn Repository, id: &str, field: &str) -> Result<(), AppError> {
    if repo.find_student(id).await?.is_none() {
        return Err(AppError::not_found("Student not found.")
            .with_detail(field, "Select an existing student."));
    }
    Ok(())
}

pub async fn ensure_course(repo: &dyn Repository, id: &str, field: &str) -> Result<(), AppError> {
    if repo.find_course(id).await?.is_none() {
        return Err(
            AppError::not_found("Course not found.").with_detail(field, "Select an existing course.")
        );
    }
    Ok(())
}

pub async fn ensure_section(repo: &dyn Repository, id: &str, field: &str) -> Result<(), AppError> {
    if repo.find_section(id).await?.is_none() {
        return Err(AppError::not_found("Section not found.")
            .with_detail(field, "Select an existing section."));
    }
    Ok(())
}

/// Reject an update body that tries to move a record to a different id.
pub fn ensure_id_unchanged(
    supplied: Option<&str>,
    path_id: &str,
    label: &str,
) -> Result<(), AppError> {
    if let Some(supplied) = supplied {
        if !supplied.trim().is_empty() && supplied.trim() != path_id {
            return Err(AppError::validation("Validation failed.")
                .with_detail("id", &format!("{label} ID cannot be changed.")));
        }
    }
    Ok(())
}
