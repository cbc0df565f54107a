// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report data model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Request body could not be read as a report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Request body must be a JSON object")]
pub struct MalformedBody;

/// Report as submitted by a caller.
///
/// Every field is optional at this stage; presence is checked by the
/// validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInput {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub discord_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ReportInput {
    /// Parse a request body.
    ///
    /// The body must be a JSON object. `null`, `false` and `0` count as
    /// absent; any other non-string value is kept as its JSON text so it
    /// fails format checks rather than presence checks.
    pub fn from_json(body: &[u8]) -> Result<Self, MalformedBody> {
        let value: Value = serde_json::from_slice(body).map_err(|_| MalformedBody)?;
        let object = value.as_object().ok_or(MalformedBody)?;

        let field = |name: &str| object.get(name).and_then(field_text);

        Ok(Self {
            url: field("url"),
            date: field("date"),
            discord_id: field("discord_id"),
            notes: field("notes"),
        })
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Null | Value::Bool(false) => None,
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Normalised report ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalReport {
    pub discord_id: String,
    pub url: String,
    pub date: String,
    pub notes: String,
    pub source: String,
    pub reported_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_body() {
        let body = br#"{"url":"https://x.test","date":"2024-01-01","discord_id":"42","notes":"n"}"#;
        let input = ReportInput::from_json(body).unwrap();

        assert_eq!(input.url.as_deref(), Some("https://x.test"));
        assert_eq!(input.date.as_deref(), Some("2024-01-01"));
        assert_eq!(input.discord_id.as_deref(), Some("42"));
        assert_eq!(input.notes.as_deref(), Some("n"));
    }

    #[test]
    fn test_falsy_fields_are_absent() {
        let body = br#"{"url":null,"date":false,"discord_id":0,"notes":null}"#;
        assert_eq!(ReportInput::from_json(body).unwrap(), ReportInput::default());
    }

    #[test]
    fn test_non_string_fields_kept_as_text() {
        let body = br#"{"url":123,"date":true,"discord_id":42,"notes":["a"]}"#;
        let input = ReportInput::from_json(body).unwrap();

        assert_eq!(input.url.as_deref(), Some("123"));
        assert_eq!(input.date.as_deref(), Some("true"));
        assert_eq!(input.discord_id.as_deref(), Some("42"));
        assert_eq!(input.notes.as_deref(), Some(r#"["a"]"#));
    }

    #[test]
    fn test_non_object_bodies_rejected() {
        assert_eq!(ReportInput::from_json(b""), Err(MalformedBody));
        assert_eq!(ReportInput::from_json(b"not json"), Err(MalformedBody));
        assert_eq!(ReportInput::from_json(b"[1,2]"), Err(MalformedBody));
        assert_eq!(ReportInput::from_json(b"\"url\""), Err(MalformedBody));
    }
}
