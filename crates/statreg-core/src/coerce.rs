//! # Boundary Field Coercion
//!
//! The wire delivers every scalar as a string. These helpers convert
//! those strings into typed values exactly once, at the edge: counts to
//! `i64`, amounts and percentages to `f64`, flags to `bool`, dates to
//! [`Timestamp`]. Past this module, records never carry raw wire strings
//! for typed fields.
//!
//! An unset optional field is `None`, not parsed — an empty string and an
//! absent field both coerce to `None` for the `*_opt` variants.

use crate::error::ValidationError;
use crate::temporal::Timestamp;

/// Coerce a required integer field (`"500"` → `500`).
pub fn int(field: &str, value: &str) -> Result<i64, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidInteger {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Coerce a required numeric field (`"2.50"` → `2.5`).
pub fn number(field: &str, value: &str) -> Result<f64, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    let parsed = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        })?;
    if !parsed.is_finite() {
        return Err(ValidationError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(parsed)
}

/// Coerce a required boolean field. Accepts the spellings legacy
/// clients send: `true`/`false`, `1`/`0`, `yes`/`no` (case-insensitive).
pub fn boolean(field: &str, value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ValidationError::InvalidBoolean {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Coerce a required date field to an absolute [`Timestamp`].
pub fn date(field: &str, value: &str) -> Result<Timestamp, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    Timestamp::parse(trimmed).map_err(|_| ValidationError::InvalidDateField {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Coerce an optional date field. Absent or empty input is `None`.
pub fn date_opt(field: &str, value: Option<&str>) -> Result<Option<Timestamp>, ValidationError> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => date(field, raw).map(Some),
    }
}

/// Coerce an optional integer field. Absent or empty input is `None`.
pub fn int_opt(field: &str, value: Option<&str>) -> Result<Option<i64>, ValidationError> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => int(field, raw).map(Some),
    }
}

/// Coerce an optional numeric field. Absent or empty input is `None`.
pub fn number_opt(field: &str, value: Option<&str>) -> Result<Option<f64>, ValidationError> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => number(field, raw).map(Some),
    }
}

/// Validate a required free-text field, trimming surrounding whitespace.
pub fn text(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    Ok(trimmed.to_string())
}

/// A percentage field: a number constrained to `0.0..=100.0`.
pub fn percentage(field: &str, value: &str) -> Result<f64, ValidationError> {
    let parsed = number(field, value)?;
    if !(0.0..=100.0).contains(&parsed) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            reason: format!("{parsed} is not within 0..=100"),
        });
    }
    Ok(parsed)
}

/// A count field: an integer constrained to be strictly positive.
pub fn positive_int(field: &str, value: &str) -> Result<i64, ValidationError> {
    let parsed = int(field, value)?;
    if parsed <= 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            reason: format!("{parsed} must be greater than zero"),
        });
    }
    Ok(parsed)
}
