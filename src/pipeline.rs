// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Request pipeline.
//!
//! One report request runs through the stages in a fixed order and stops at
//! the first rejection:
//!
//! method → authenticate → rate limit → parse → validate → format → dispatch
//!
//! Each stage failure is a [`RelayError`], which renders its own response.

use crate::auth::{AuthResult, Authenticator};
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::error::{RelayError, Result};
use crate::formatter::format_report;
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::metrics::RelayMetrics;
use crate::models::{CanonicalReport, ReportInput};
use crate::validator::{ReportValidator, ValidationResult};
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub const ACCEPTED_MESSAGE: &str = "Report received and forwarded to the DART Project";

const REPORT_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const REPORT_ID_SUFFIX_LEN: usize = 9;

/// The parts of an HTTP request the pipeline looks at.
#[derive(Debug, Clone, Copy)]
pub struct InboundRequest<'a> {
    pub method: &'a Method,
    pub api_key: Option<&'a str>,
    /// Rate limit bucket for the caller
    pub client_id: &'a str,
    pub body: &'a [u8],
}

/// A report that reached the sink.
#[derive(Debug, Clone)]
pub struct ReportAccepted {
    pub report_id: String,
    pub report: CanonicalReport,
}

/// Success response body.
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub success: bool,
    pub message: &'static str,
    pub report_id: String,
}

/// Orchestrates the admission and delivery stages.
#[derive(Clone)]
pub struct ReportPipeline {
    authenticator: Authenticator,
    limiter: RateLimiter,
    validator: ReportValidator,
    dispatcher: Dispatcher,
    metrics: Option<RelayMetrics>,
}

impl ReportPipeline {
    pub fn new(
        authenticator: Authenticator,
        limiter: RateLimiter,
        validator: ReportValidator,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            authenticator,
            limiter,
            validator,
            dispatcher,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: RelayMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Run every stage, returning the first rejection.
    pub async fn process(&self, request: InboundRequest<'_>) -> Result<ReportAccepted> {
        if *request.method != Method::POST {
            return Err(RelayError::MethodNotAllowed);
        }

        let label = match self.authenticator.authenticate(request.api_key) {
            AuthResult::Admitted { label } => label,
            AuthResult::Rejected(rejection) => return Err(rejection.into()),
        };

        if let RateLimitResult::Limited { retry_after } = self.limiter.check(request.client_id).await
        {
            return Err(RelayError::RateLimited { retry_after });
        }

        let input = ReportInput::from_json(request.body)?;

        if let ValidationResult::Invalid(errors) = self.validator.validate(&input) {
            return Err(RelayError::Validation(errors));
        }

        let report = format_report(&input, &label);

        let started = Instant::now();
        let outcome = self.dispatcher.deliver(&report).await;
        if let Some(metrics) = &self.metrics {
            metrics.observe_dispatch(started.elapsed().as_secs_f64());
        }

        match outcome? {
            DispatchOutcome::Delivered { .. } => Ok(ReportAccepted {
                report_id: generate_report_id(),
                report,
            }),
            DispatchOutcome::Failed { status, message } => {
                Err(RelayError::Dispatch { status, message })
            }
        }
    }

    /// Run the pipeline and render the HTTP response.
    pub async fn handle(&self, request: InboundRequest<'_>) -> Response {
        let result = self.process(request).await;

        if let Some(metrics) = &self.metrics {
            match &result {
                Ok(_) => metrics.record_outcome("accepted"),
                Err(err) => metrics.record_outcome(err.outcome()),
            }
        }

        match result {
            Ok(accepted) => {
                info!(
                    report_id = %accepted.report_id,
                    source = %accepted.report.source,
                    url = %accepted.report.url,
                    "Report forwarded"
                );
                (
                    StatusCode::OK,
                    Json(AcceptedResponse {
                        success: true,
                        message: ACCEPTED_MESSAGE,
                        report_id: accepted.report_id,
                    }),
                )
                    .into_response()
            }
            Err(err) => {
                log_rejection(&err, request.client_id);
                err.into_response()
            }
        }
    }
}

fn log_rejection(err: &RelayError, client_id: &str) {
    match err {
        RelayError::MethodNotAllowed | RelayError::MalformedBody(_) | RelayError::Validation(_) => {
            debug!(client = %client_id, error = %err, "Request rejected")
        }
        RelayError::Auth(_) | RelayError::RateLimited { .. } => {
            info!(client = %client_id, error = %err, "Request refused")
        }
        RelayError::Dispatch { .. } => {
            warn!(client = %client_id, error = %err, "Report not delivered")
        }
        RelayError::Configuration(_) | RelayError::Internal(_) => {
            error!(client = %client_id, error = %err, "Error processing report")
        }
    }
}

/// Epoch milliseconds plus a short random base36 suffix.
pub fn generate_report_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..REPORT_ID_SUFFIX_LEN)
        .map(|_| REPORT_ID_ALPHABET[rng.gen_range(0..REPORT_ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}
