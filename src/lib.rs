// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! URL Report Relay
//!
//! Accepts authenticated reports of suspicious URLs and relays them to a
//! Discord webhook:
//!
//! - API key authentication against a flat `key:label` table
//! - Per-client fixed-window rate limiting (120 requests/minute default,
//!   at most 500 tracked clients)
//! - Payload validation (URL and date)
//! - Normalisation into a canonical report
//! - Single-attempt delivery to the webhook

pub mod auth;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod dispatcher;
pub mod error;
pub mod formatter;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod validator;

pub use config::Config;
pub use error::{RelayError, Result};
pub use limiter::{RateLimitResult, RateLimiter};
pub use pipeline::ReportPipeline;
pub use validator::{ReportValidator, ValidationResult};
