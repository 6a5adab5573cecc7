//! Field rules applied by the facade before anything reaches storage.
//!
//! Every function returns the normalized value (trimmed, lower-cased, ...)
//! or a `DomainError::Validation` naming the offending field.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{DomainError, DomainResult};

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_TITLE_LEN: usize = 100;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 255;
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("email regex is valid")
});

fn invalid(msg: impl Into<String>) -> DomainError {
    DomainError::Validation(msg.into())
}

fn bounded_text(field: &str, value: &str, max: usize) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max {
        return Err(invalid(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(trimmed.to_string())
}

/// first_name / last_name
pub fn person_name(field: &str, value: &str) -> DomainResult<String> {
    bounded_text(field, value, MAX_NAME_LEN)
}

pub fn email(value: &str) -> DomainResult<String> {
    let normalized = value.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(invalid("email is required"));
    }
    if !EMAIL_RE.is_match(&normalized) {
        return Err(invalid(format!("Invalid email format: {}", normalized)));
    }
    Ok(normalized)
}

/// Checked on the raw input; passwords are never trimmed
pub fn password(value: &str) -> DomainResult<()> {
    let len = value.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(invalid(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(invalid(format!(
            "password must be at most {} characters",
            MAX_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn title(value: &str) -> DomainResult<String> {
    bounded_text("title", value, MAX_TITLE_LEN)
}

/// Blank descriptions are stored as absent
pub fn description(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

pub fn price(value: f64) -> DomainResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid("price must be a non-negative number"));
    }
    Ok(value)
}

pub fn latitude(value: f64) -> DomainResult<f64> {
    if !value.is_finite() || !(-90.0..=90.0).contains(&value) {
        return Err(invalid("latitude must be between -90 and 90"));
    }
    Ok(value)
}

pub fn longitude(value: f64) -> DomainResult<f64> {
    if !value.is_finite() || !(-180.0..=180.0).contains(&value) {
        return Err(invalid("longitude must be between -180 and 180"));
    }
    Ok(value)
}

pub fn amenity_name(value: &str) -> DomainResult<String> {
    bounded_text("name", value, MAX_NAME_LEN)
}

pub fn review_text(value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("text is required"));
    }
    Ok(trimmed.to_string())
}

pub fn rating(value: i64) -> DomainResult<i64> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(invalid(format!(
            "rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(value)
}

/// Drop repeated ids while keeping first-seen order
pub fn dedup_ids(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .map(|id| id.trim().to_string())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
