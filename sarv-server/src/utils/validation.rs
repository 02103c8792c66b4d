//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, menu item, printer, customer, cafe, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Ledger reasons, notes
pub const MAX_NOTE_LEN: usize = 500;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs (cafe image, instagram, print job file)
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

/// Validate an http(s) URL. `require_host` additionally pins the hostname
/// (used for the instagram profile link).
pub fn validate_http_url(
    value: &str,
    field: &str,
    require_host: Option<&str>,
) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.len() > MAX_URL_LEN {
        return Err(AppError::validation(format!("{field} is too long")));
    }
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| AppError::validation(format!("{field} must be an http(s) URL")))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    if host.is_empty() {
        return Err(AppError::validation(format!("{field} has no host")));
    }
    if let Some(expected) = require_host
        && !host.contains(expected)
    {
        return Err(AppError::validation(format!(
            "{field} must point to {expected}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank_and_oversized() {
        assert!(validate_required_text("Espresso", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn url_validation_checks_scheme_and_host() {
        assert!(validate_http_url("https://example.com/logo.png", "image", None).is_ok());
        assert!(validate_http_url("ftp://example.com", "image", None).is_err());
        assert!(
            validate_http_url("https://instagram.com/sarv", "instagram", Some("instagram.com"))
                .is_ok()
        );
        assert!(
            validate_http_url("https://example.com/sarv", "instagram", Some("instagram.com"))
                .is_err()
        );
    }
}
