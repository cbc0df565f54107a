// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! URL Report Relay Service
//!
//! Accepts `POST /api/report` with an `x-api-key` header and a JSON body
//! `{ url, date, discord_id?, notes? }`, and relays valid reports to a
//! Discord webhook.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables, optionally seeded
//! from a `.env` file:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `API_KEYS`: Comma-separated `key:label` pairs
//! - `RATE_LIMIT`: Max requests per minute per client (default: 120)
//! - `RATE_LIMIT_WINDOW_SECS`: Window length, 1 to 86400 (default: 60)
//! - `RATE_LIMIT_MAX_CLIENTS`: Max tracked clients (default: 500)
//! - `DISCORD_WEBHOOK_URL`: Webhook URL (required for delivery)
//! - `WEBHOOK_TIMEOUT_MS`: Webhook request timeout (default: 10000)
//! - `METRICS_ENABLED`: Expose `/metrics` (default: true)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use url_report_relay::{
    config::Config,
    credentials::CredentialStore,
    handlers::{router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env();
    let api_key_count = CredentialStore::new(config.auth.api_keys.clone())
        .snapshot()
        .len();
    info!(
        bind_addr = %config.bind_addr,
        rate_limit = config.rate_limit.max_requests,
        window_secs = config.rate_limit.window_secs,
        max_tracked_clients = config.rate_limit.max_tracked_clients,
        api_keys = api_key_count,
        "Starting URL report relay"
    );
    if config.webhook.url.is_none() {
        warn!("DISCORD_WEBHOOK_URL is not set; reports will fail with 500");
    }

    let state = Arc::new(AppState::from_config(config.clone())?);

    // Spawn cleanup task
    let cleanup_state = state.clone();
    let cleanup_every = config.rate_limit.window_duration();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_every);
        loop {
            interval.tick().await;
            cleanup_state.pipeline.limiter().cleanup().await;
        }
    });

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
