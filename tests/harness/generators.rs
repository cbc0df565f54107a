// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use serde_json::{json, Value};

/// Generate a pool of client identifiers (10.x.x.x private range).
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let a = (i >> 16) & 0xFF;
            let b = (i >> 8) & 0xFF;
            let c = i & 0xFF;
            format!("10.{a}.{b}.{c}")
        })
        .collect()
}

/// Generate plausible but unconfigured API keys.
pub fn generate_guessed_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("guess-{i:08x}")).collect()
}

/// A well-formed report body.
pub fn valid_report(i: usize) -> Value {
    json!({
        "url": format!("https://phish-{i}.example.com/login"),
        "date": "2024-05-01",
        "notes": format!("report #{i}")
    })
}

/// Report bodies that must fail validation.
pub fn invalid_reports() -> Vec<Value> {
    vec![
        json!({}),
        json!({ "url": "notaurl", "date": "2024-05-01" }),
        json!({ "url": "https://ok.example", "date": "someday" }),
        json!({ "url": "", "date": "" }),
        json!({ "url": 42, "date": true }),
        json!({ "url": "//no-scheme.example", "date": "2024-05-01" }),
    ]
}

/// Strings that must never parse as report URLs.
pub fn generate_malformed_urls() -> Vec<&'static str> {
    vec![
        "notaurl",
        "example.com",
        "/relative/path",
        "//protocol-relative.example",
        "https://",
        "http://exa mple.com",
        "http://[::1",
        "",
    ]
}
