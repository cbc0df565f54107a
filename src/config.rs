// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the report relay.
//!
//! Every field can be supplied through the process environment (optionally
//! seeded from a `.env` file by the binary). Unset or unparseable values fall
//! back to the defaults below.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Configuration for the report relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// API key table
    #[serde(default)]
    pub auth: AuthConfig,

    /// Downstream webhook
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per client per window (default: 120)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Maximum number of distinct clients tracked at once (default: 500)
    #[serde(default = "default_max_tracked_clients")]
    pub max_tracked_clients: usize,
}

/// API key configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Comma-separated `key:label` pairs.
    #[serde(default)]
    pub api_keys: String,
}

/// Webhook delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Discord webhook URL. Delivery fails fast when unset.
    #[serde(default)]
    pub url: Option<String>,

    /// Outbound request timeout in milliseconds (default: 10000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

/// Shortest accepted rate window.
pub const MIN_WINDOW_SECS: u64 = 1;
/// Longest accepted rate window (one day).
pub const MAX_WINDOW_SECS: u64 = 86_400;

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_requests() -> u32 {
    120
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_tracked_clients() -> usize {
    500
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            auth: AuthConfig::default(),
            webhook: WebhookConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            max_tracked_clients: default_max_tracked_clients(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration, clamped to the supported range
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs.clamp(MIN_WINDOW_SECS, MAX_WINDOW_SECS))
    }
}

impl WebhookConfig {
    /// Get the outbound request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(default_bind_addr),
            rate_limit: RateLimitConfig {
                max_requests: parse_var(&lookup, "RATE_LIMIT").unwrap_or_else(default_max_requests),
                window_secs: parse_var::<u64, _>(&lookup, "RATE_LIMIT_WINDOW_SECS")
                    .filter(|secs| (MIN_WINDOW_SECS..=MAX_WINDOW_SECS).contains(secs))
                    .unwrap_or_else(default_window_secs),
                max_tracked_clients: parse_var(&lookup, "RATE_LIMIT_MAX_CLIENTS")
                    .unwrap_or_else(default_max_tracked_clients),
            },
            auth: AuthConfig {
                api_keys: lookup("API_KEYS").unwrap_or_default(),
            },
            webhook: WebhookConfig {
                url: lookup("DISCORD_WEBHOOK_URL").filter(|v| !v.trim().is_empty()),
                timeout_ms: parse_var(&lookup, "WEBHOOK_TIMEOUT_MS").unwrap_or_else(default_timeout_ms),
            },
            metrics: MetricsConfig {
                enabled: parse_var(&lookup, "METRICS_ENABLED").unwrap_or_else(default_true),
                ..Default::default()
            },
        }
    }
}

/// Parse a variable, treating unset or unparseable values as absent.
fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|v| v.trim().parse().ok())
}
