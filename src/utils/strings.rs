/// Trim a caller-supplied string field.
pub fn clean(value: &str) -> String {
    value.trim().to_string()
}

/// Trim an optional field, dropping values that are empty after trimming.
pub fn clean_opt(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Emails compare case-insensitively, so they are stored lowercased.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Semester labels are uppercased on the way in (`2024f` and `2024F` are the
/// same term).
pub fn normalize_semester(value: &str) -> String {
    value.trim().to_uppercase()
}
