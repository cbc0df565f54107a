// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tallies for abuse simulation results.

use std::collections::{HashMap, HashSet};
use std::fmt;
use url_report_relay::RelayError;

/// Where a simulated request stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Passed every admission stage
    Admitted,
    Unauthorized,
    RateLimited,
    Invalid,
    Other,
}

impl Outcome {
    /// Classify a pipeline result. With no webhook configured, an admitted
    /// request stops at the configuration check.
    pub fn classify<T>(result: &Result<T, RelayError>) -> Self {
        match result {
            Ok(_) | Err(RelayError::Configuration(_)) => Outcome::Admitted,
            Err(RelayError::Auth(_)) => Outcome::Unauthorized,
            Err(RelayError::RateLimited { .. }) => Outcome::RateLimited,
            Err(RelayError::Validation(_)) | Err(RelayError::MalformedBody(_)) => Outcome::Invalid,
            Err(_) => Outcome::Other,
        }
    }
}

/// Collects outcomes during a simulation.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    outcomes: HashMap<Outcome, usize>,
    admitted_per_client: HashMap<String, usize>,
    clients: HashSet<String>,
}

impl AttackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome, client: &str) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        self.clients.insert(client.to_string());
        if outcome == Outcome::Admitted {
            *self.admitted_per_client.entry(client.to_string()).or_insert(0) += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn unique_clients(&self) -> usize {
        self.clients.len()
    }

    /// Highest number of admissions granted to any single client.
    pub fn max_admitted_per_client(&self) -> usize {
        self.admitted_per_client.values().copied().max().unwrap_or(0)
    }
}

impl fmt::Display for AttackMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} admitted={} unauthorized={} rate_limited={} invalid={} other={} clients={}",
            self.total(),
            self.count(Outcome::Admitted),
            self.count(Outcome::Unauthorized),
            self.count(Outcome::RateLimited),
            self.count(Outcome::Invalid),
            self.count(Outcome::Other),
            self.unique_clients(),
        )
    }
}
