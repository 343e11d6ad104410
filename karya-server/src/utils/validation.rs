//! Input validation helpers
//!
//! Centralized text length constants and validation functions for handlers
//! that take shared DTOs directly.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Titles, category names
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before provider-side hashing)
pub const MIN_PASSWORD_LEN: usize = 8;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_rejected() {
        assert!(validate_required_text("  ", "title", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn overlong_text_is_rejected() {
        let text = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&text, "title", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn normal_text_passes() {
        assert!(validate_required_text("Batik Design", "title", MAX_NAME_LEN).is_ok());
    }
}
