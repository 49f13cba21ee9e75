//! Input validation helpers
//!
//! Centralized text length constants and validation functions. SQLite TEXT
//! has no built-in length enforcement, so limits are applied here before
//! anything reaches the domain layer.

use super::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: restaurant, product, category, consumer, table number
pub const MAX_NAME_LEN: usize = 200;

/// Slugs (URL-facing restaurant identifier)
pub const MAX_SLUG_LEN: usize = 100;

/// Descriptions
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_text_fails() {
        assert!(validate_required_text("", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Ana", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn oversized_text_fails() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
        assert!(validate_optional_text(&Some(long), "name", MAX_NAME_LEN).is_err());
        assert!(validate_optional_text(&None, "name", MAX_NAME_LEN).is_ok());
    }
}
