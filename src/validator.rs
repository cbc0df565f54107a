// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Report payload validator.
//!
//! Checks are accumulated rather than short-circuited, so a caller sees
//! every defect in one response:
//! - `url` present and parseable as an absolute URL
//! - `date` present and parseable as a calendar date or date-time

use crate::models::ReportInput;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Validation error types.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("Date is required")]
    MissingDate,

    #[error("Invalid date format")]
    InvalidDate,
}

/// Result of validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Report is valid
    Valid,
    /// Report is invalid; errors are in check order
    Invalid(Vec<ValidationError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Report payload validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportValidator;

impl ReportValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a submitted report.
    pub fn validate(&self, input: &ReportInput) -> ValidationResult {
        let mut errors = Vec::new();

        match non_empty(input.url.as_deref()) {
            None => errors.push(ValidationError::MissingUrl),
            Some(url) if !is_valid_url(url) => {
                debug!(url = %url, "Invalid report URL");
                errors.push(ValidationError::InvalidUrl);
            }
            Some(_) => {}
        }

        match non_empty(input.date.as_deref()) {
            None => errors.push(ValidationError::MissingDate),
            Some(date) if !is_valid_date(date) => {
                debug!(date = %date, "Invalid report date");
                errors.push(ValidationError::InvalidDate);
            }
            Some(_) => {}
        }

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Absolute URL per the WHATWG URL grammar.
pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Calendar date or date-time in one of the accepted textual forms.
pub fn is_valid_date(date: &str) -> bool {
    let date = date.trim();

    DateTime::parse_from_rfc3339(date).is_ok()
        || DateTime::parse_from_rfc2822(date).is_ok()
        || NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
        || NAIVE_DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(date, format).is_ok())
}
