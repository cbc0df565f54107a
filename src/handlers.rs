// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the report relay service.

use crate::auth::Authenticator;
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::dispatcher::Dispatcher;
use crate::error::{RelayError, StartupError};
use crate::limiter::RateLimiter;
use crate::metrics::RelayMetrics;
use crate::pipeline::{InboundRequest, ReportPipeline};
use crate::validator::ReportValidator;
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Shared application state.
pub struct AppState {
    pub pipeline: ReportPipeline,
    pub metrics: RelayMetrics,
    pub config: Config,
}

impl AppState {
    /// Wire every pipeline stage from configuration.
    pub fn from_config(config: Config) -> Result<Self, StartupError> {
        let metrics = RelayMetrics::new()?;
        let pipeline = ReportPipeline::new(
            Authenticator::new(CredentialStore::new(config.auth.api_keys.clone())),
            RateLimiter::new(config.rate_limit.clone()),
            ReportValidator::new(),
            Dispatcher::new(&config.webhook)?,
        )
        .with_metrics(metrics.clone());

        Ok(Self {
            pipeline,
            metrics,
            config,
        })
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/api/report", any(report))
        .route("/health", get(health))
        .route("/healthz", get(health));

    if state.config.metrics.enabled {
        router = router.route(&state.config.metrics.path, get(metrics));
    }

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "url-report-relay",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Accept a suspicious URL report.
pub async fn report(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Response {
    let api_key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    let client_id = client_identifier(&headers, connect_info.map(|ConnectInfo(addr)| addr));

    state
        .pipeline
        .handle(InboundRequest {
            method: &method,
            api_key,
            client_id: &client_id,
            body: &body,
        })
        .await
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    let tracked = state.pipeline.limiter().tracked().await;
    state.metrics.set_tracked_clients(tracked);

    match state.metrics.encode() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Rate limit bucket for a request.
///
/// The first entry of `X-Forwarded-For` wins, then the peer address.
pub fn client_identifier(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').map(str::trim).find(|hop| !hop.is_empty()))
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "Handler panicked");
    RelayError::Internal(detail.to_string()).into_response()
}
