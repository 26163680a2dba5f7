//! Pure validation rules: stateless, deterministic, no I/O.
//!
//! Format checks live here; existence checks against the store belong to
//! the services.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, AppResult};

/// `local@domain.tld`-shaped email pattern.
pub static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Check email shape without touching the store.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate and normalize note content: required, non-empty after trimming.
/// Returns the trimmed content that gets stored.
pub fn note_content(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request("Content is required"));
    }
    Ok(trimmed.to_string())
}
