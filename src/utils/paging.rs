use crate::utils::errors::AppError;

/// Validate an optional `limit` query argument. `None` falls back to the
/// per-kind default at the repository layer.
pub fn check_limit(limit: Option<i64>) -> Result<Option<i64>, AppError> {
    match limit {
        Some(value) if value <= 0 => Err(AppError::validation("limit must be a positive integer.")),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_limits() {
        assert!(check_limit(Some(0)).is_err());
        assert!(check_limit(Some(-5)).is_err());
        assert_eq!(check_limit(Some(50)).unwrap(), Some(50));
        assert_eq!(check_limit(None).unwrap(), None);
    }
}
