use std::collections::BTreeMap;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::repo::RepoError;

/// Application error: an HTTP status, a human-readable message, and an
/// optional map of field-level details for input errors.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub details: Option<BTreeMap<String, String>>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: BTreeMap<String, String>) -> Self {
        if !details.is_empty() {
            self.details = Some(details);
        }
        self
    }

    pub fn with_detail(mut self, field: &str, message: &str) -> Self {
        self.details
            .get_or_insert_with(BTreeMap::new)
            .insert(field.to_string(), message.to_string());
        self
    }

    pub fn validation(message: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, anyhow::anyhow!("{message}"))
    }

    pub fn not_found(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, anyhow::anyhow!("{message}"))
    }

    pub fn conflict(message: &str) -> Self {
        Self::new(StatusCode::CONFLICT, anyhow::anyhow!("{message}"))
    }

    pub fn unavailable() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            anyhow::anyhow!("Database unavailable. Please try again later."),
        )
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!("{message}"))
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!("forbidden"))
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self.details {
            Some(details) => Json(json!({
                "error": self.error.to_string(),
                "details": details,
            })),
            None => Json(json!({
                "error": self.error.to_string()
            })),
        };

        (self.status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Conflict(constraint) => Self::conflict(&format!(
                "A record violating the {constraint} uniqueness constraint already exists."
            )),
            RepoError::Unavailable(_) => Self::unavailable(),
            RepoError::Other(err) => Self::internal(err),
        }
    }
}
