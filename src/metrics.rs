// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for request outcomes and webhook latency.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

/// Relay metrics, held in a private registry.
#[derive(Clone)]
pub struct RelayMetrics {
    registry: Registry,
    requests: IntCounterVec,
    dispatch_duration: Histogram,
    tracked_clients: IntGauge,
}

impl RelayMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new(
                "report_relay_requests_total",
                "Report requests by pipeline outcome",
            ),
            &["outcome"],
        )?;
        let dispatch_duration = Histogram::with_opts(HistogramOpts::new(
            "report_relay_dispatch_duration_seconds",
            "Time spent delivering a report to the webhook",
        ))?;
        let tracked_clients = IntGauge::new(
            "report_relay_rate_limit_tracked_clients",
            "Client identifiers currently held by the rate limiter",
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(dispatch_duration.clone()))?;
        registry.register(Box::new(tracked_clients.clone()))?;

        Ok(Self {
            registry,
            requests,
            dispatch_duration,
            tracked_clients,
        })
    }

    pub fn record_outcome(&self, outcome: &str) {
        self.requests.with_label_values(&[outcome]).inc();
    }

    pub fn observe_dispatch(&self, seconds: f64) {
        self.dispatch_duration.observe(seconds);
    }

    pub fn set_tracked_clients(&self, tracked: usize) {
        self.tracked_clients
            .set(i64::try_from(tracked).unwrap_or(i64::MAX));
    }

    /// Requests counted under `outcome` so far.
    pub fn outcome_count(&self, outcome: &str) -> u64 {
        self.requests.with_label_values(&[outcome]).get()
    }

    /// Render the registry in the Prometheus text format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
