// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Builds the canonical report from a validated submission.

use crate::models::{CanonicalReport, ReportInput};
use chrono::{DateTime, SecondsFormat, Utc};

pub const DISCORD_ID_NOT_PROVIDED: &str = "Not provided";
pub const NOTES_NOT_PROVIDED: &str = "No notes provided";

/// Format a report stamped with the current time.
pub fn format_report(input: &ReportInput, source: &str) -> CanonicalReport {
    format_report_at(input, source, Utc::now())
}

/// Format a report stamped with `now`.
///
/// `url` and `date` are expected to have passed validation; absent values
/// become empty strings.
pub fn format_report_at(input: &ReportInput, source: &str, now: DateTime<Utc>) -> CanonicalReport {
    CanonicalReport {
        discord_id: or_sentinel(input.discord_id.as_deref(), DISCORD_ID_NOT_PROVIDED),
        url: input.url.clone().unwrap_or_default(),
        date: input.date.clone().unwrap_or_default(),
        notes: or_sentinel(input.notes.as_deref(), NOTES_NOT_PROVIDED),
        source: source.to_string(),
        reported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

fn or_sentinel(value: Option<&str>, sentinel: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => sentinel.to_string(),
    }
}
