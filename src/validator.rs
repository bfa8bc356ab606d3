use std::collections::BTreeMap;

use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::NaiveTime;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::utils::errors::AppError;

/// Flatten validator output into a field → message map for the error payload.
fn collect_details(errors: &ValidationErrors, prefix: &str, out: &mut BTreeMap<String, String>) {
    for (field, kind) in errors.errors() {
        let name = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(error) = field_errors.first() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{name} is invalid"));
                    out.insert(name, message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_details(nested, &name, out),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    collect_details(nested, &format!("{name}[{index}]"), out);
                }
            }
        }
    }
}

/// JSON extractor that rejects malformed bodies and validator failures with a
/// 400 and a field-level detail map, before any handler logic runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let error_msg = rejection.body_text();

                if error_msg.contains("missing field") {
                    let field = error_msg
                        .split("missing field `")
                        .nth(1)
                        .and_then(|s| s.split('`').next())
                        .unwrap_or("unknown");
                    return AppError::validation("Validation failed.")
                        .with_detail(field, &format!("{field} is required"));
                }

                if error_msg.contains("invalid type") {
                    return AppError::validation("Invalid field type in request");
                }

                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::new(
                        StatusCode::BAD_REQUEST,
                        anyhow!("Missing 'Content-Type: application/json' header"),
                    );
                }

                AppError::validation("Request body must be JSON.")
            })?;

        value.validate().map_err(|errors| {
            let mut details = BTreeMap::new();
            collect_details(&errors, "", &mut details);
            AppError::validation("Validation failed.").with_details(details)
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Required strings must carry content, not just whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Range check for `Option<Option<f64>>` score patches. The derive unwraps
/// both layers before calling, so `Some(None)` (an explicit null that clears
/// the score) and an omitted field never reach this check.
pub fn score_patch_in_range(value: f64) -> Result<(), ValidationError> {
    if !(0.0..=10.0).contains(&value) {
        let mut error = ValidationError::new("range");
        error.message = Some("Scores must be between 0 and 10.".into());
        return Err(error);
    }
    Ok(())
}

/// Meeting times are `HH:MM` wall-clock strings.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(not_blank("  ").is_err());
        assert!(not_blank("CS101").is_ok());
    }

    #[test]
    fn score_patch_bounds() {
        assert!(score_patch_in_range(0.0).is_ok());
        assert!(score_patch_in_range(10.0).is_ok());
        assert!(score_patch_in_range(-0.1).is_err());
        assert!(score_patch_in_range(10.1).is_err());
    }

    #[test]
    fn times_parse_as_hh_mm() {
        assert!(parse_time("09:30").is_some());
        assert!(parse_time("24:00").is_none());
        assert!(parse_time("9am").is_none());
    }
}
