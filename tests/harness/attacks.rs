// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse patterns for security testing.

/// Abuse pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Number of distinct client identifiers
    pub unique_clients: usize,
    /// Use a configured API key instead of guesses
    pub valid_key: bool,
    /// Send well-formed reports instead of invalid ones
    pub valid_payload: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_clients: 1,
            valid_key: true,
            valid_payload: true,
        }
    }
}

/// Predefined abuse patterns.
impl AttackConfig {
    /// One client hammering the endpoint.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 300,
            ..Default::default()
        }
    }

    /// Many clients, a few requests each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 600,
            unique_clients: 200,
            ..Default::default()
        }
    }

    /// Brute-forcing API keys.
    pub fn key_guessing() -> Self {
        Self {
            total_requests: 500,
            unique_clients: 5,
            valid_key: false,
            ..Default::default()
        }
    }

    /// Authenticated caller sending junk payloads.
    pub fn junk_payloads() -> Self {
        Self {
            total_requests: 60,
            valid_payload: false,
            ..Default::default()
        }
    }
}
