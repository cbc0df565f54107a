// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the report relay.
//!
//! Every stage of the pipeline that can stop a request maps onto a
//! [`RelayError`] variant, which knows its status code and response body.

use crate::auth::AuthRejection;
use crate::models::MalformedBody;
use crate::validator::ValidationError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Try again in 1 minute.";
pub const DISPATCH_FAILED_MESSAGE: &str = "Failed to send report to Discord";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Relay is missing configuration it cannot run without.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Discord webhook URL is not configured")]
    MissingWebhookUrl,
}

/// Failure while assembling the service at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Application error types
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Auth(#[from] AuthRejection),

    #[error("Rate limit exceeded. Try again in 1 minute.")]
    RateLimited { retry_after: Duration },

    #[error(transparent)]
    MalformedBody(#[from] MalformedBody),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Webhook delivery failed with status {status}: {message}")]
    Dispatch { status: u16, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Auth(rejection) => rejection.status_code(),
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::MalformedBody(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Dispatch { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for request outcome metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Auth(_) => "unauthorized",
            Self::RateLimited { .. } => "rate_limited",
            Self::MalformedBody(_) | Self::Validation(_) => "invalid",
            Self::Dispatch { .. } => "dispatch_failed",
            Self::Configuration(_) | Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match self {
            Self::MethodNotAllowed | Self::Auth(_) => {
                (status, Json(json!({ "error": message }))).into_response()
            }
            Self::RateLimited { retry_after } => {
                // Round up so clients never retry before the window has closed.
                let retry_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                (
                    status,
                    [(header::RETRY_AFTER, retry_secs.to_string())],
                    Json(json!({ "error": RATE_LIMIT_MESSAGE })),
                )
                    .into_response()
            }
            Self::MalformedBody(_) => {
                (status, Json(json!({ "errors": [message] }))).into_response()
            }
            Self::Validation(errors) => {
                let errors: Vec<String> = errors.iter().map(ToString::to_string).collect();
                (status, Json(json!({ "errors": errors }))).into_response()
            }
            Self::Dispatch { message, .. } => (
                status,
                Json(json!({ "error": DISPATCH_FAILED_MESSAGE, "details": message })),
            )
                .into_response(),
            Self::Configuration(_) | Self::Internal(_) => {
                (status, Json(json!({ "error": INTERNAL_ERROR_MESSAGE }))).into_response()
            }
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RelayError>;
