// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Webhook delivery.
//!
//! A canonical report is rendered as a single Discord embed and POSTed once
//! to the configured webhook. The embed layout (title, colour, field names
//! and order, footer) is what the moderation channel renders, so it must not
//! drift.

use crate::config::WebhookConfig;
use crate::error::ConfigurationError;
use crate::models::CanonicalReport;
use serde::Serialize;
use tracing::{debug, warn};

pub const EMBED_TITLE: &str = "🚨 Malicious URL Report";
/// Red.
pub const EMBED_COLOR: u32 = 0xFF0000;

/// Outcome of a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Sink answered with a 2xx status
    Delivered { status: u16 },
    /// Sink answered with a non-2xx status, or never answered (status 500)
    Failed { status: u16, message: String },
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}

/// Webhook request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

fn field(name: &str, value: &str, inline: bool) -> EmbedField {
    EmbedField {
        name: name.to_string(),
        value: value.to_string(),
        inline,
    }
}

/// Render a report as the webhook document.
pub fn build_payload(report: &CanonicalReport) -> WebhookPayload {
    WebhookPayload {
        embeds: vec![Embed {
            title: EMBED_TITLE.to_string(),
            color: EMBED_COLOR,
            fields: vec![
                field("Suspicious URL", &report.url, false),
                field("Discord User ID", &report.discord_id, true),
                field("Date Sent", &report.date, true),
                field("Reported By", &report.source, true),
                field("Notes", &report.notes, false),
            ],
            footer: EmbedFooter {
                text: format!("Reported at {}", report.reported_at),
            },
        }],
    }
}

/// Delivers reports to the webhook sink.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl Dispatcher {
    /// Create a dispatcher whose HTTP client enforces the configured timeout.
    pub fn new(config: &WebhookConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            webhook_url: config.url.clone(),
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// POST the report once. Never retries.
    ///
    /// Returns `Err` without any I/O when no webhook URL is configured.
    pub async fn deliver(
        &self,
        report: &CanonicalReport,
    ) -> Result<DispatchOutcome, ConfigurationError> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or(ConfigurationError::MissingWebhookUrl)?;

        let payload = build_payload(report);

        let outcome = match self.client.post(url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => DispatchOutcome::Delivered {
                status: response.status().as_u16(),
            },
            Ok(response) => {
                let status = response.status().as_u16();
                DispatchOutcome::Failed {
                    status,
                    message: format!("Request failed with status code {status}"),
                }
            }
            Err(err) => DispatchOutcome::Failed {
                status: 500,
                message: err.to_string(),
            },
        };

        match &outcome {
            DispatchOutcome::Delivered { status } => debug!(status, "Report delivered to webhook"),
            DispatchOutcome::Failed { status, message } => {
                warn!(status, error = %message, "Error sending report to webhook")
            }
        }

        Ok(outcome)
    }
}
