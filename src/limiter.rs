// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter keyed by client identifier.
//!
//! Each identifier gets a counter and a window expiry set when the first
//! request of the window is recorded. Requests over the limit are refused
//! without touching the count or the expiry, so a client pinned at the cap
//! cannot keep its own window alive.
//!
//! The counter table is bounded. When a new identifier arrives and the table
//! is full, expired windows are purged first, then the least recently touched
//! identifier is evicted.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until the current window expires
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Counter for one identifier.
#[derive(Debug, Clone)]
struct WindowCounter {
    count: u32,
    window_expiry: Instant,
    /// Recency stamp from the table's touch sequence
    last_touched: u64,
}

impl WindowCounter {
    fn is_live(&self, now: Instant) -> bool {
        now < self.window_expiry
    }
}

#[derive(Debug, Default)]
struct CounterTable {
    entries: HashMap<String, WindowCounter>,
    touch_seq: u64,
}

impl CounterTable {
    fn next_touch(&mut self) -> u64 {
        self.touch_seq += 1;
        self.touch_seq
    }

    /// Free a slot for a new identifier.
    fn make_room(&mut self, now: Instant, capacity: usize) {
        if self.entries.len() < capacity {
            return;
        }

        self.entries.retain(|_, counter| counter.is_live(now));

        while self.entries.len() >= capacity {
            let victim = self
                .entries
                .iter()
                .min_by_key(|(_, counter)| counter.last_touched)
                .map(|(identifier, _)| identifier.clone());

            match victim {
                Some(identifier) => {
                    debug!(identifier = %identifier, "Evicting least recently used rate counter");
                    self.entries.remove(&identifier);
                }
                None => break,
            }
        }
    }
}

/// Thread-safe rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    /// Configuration
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    table: Arc<RwLock<CounterTable>>,
}

impl RateLimiter {
    /// Create a new rate limiter using the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a rate limiter that reads time from `clock`.
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            table: Arc::new(RwLock::new(CounterTable::default())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn capacity(&self) -> usize {
        self.config.max_tracked_clients.max(1)
    }

    /// Check the limit for `identifier` and record the request if admitted.
    pub async fn check(&self, identifier: &str) -> RateLimitResult {
        let limit = self.config.max_requests;
        let window = self.config.window_duration();
        let now = self.clock.now();

        let mut guard = self.table.write().await;
        let table = &mut *guard;
        let touch = table.next_touch();

        let live = table
            .entries
            .get(identifier)
            .filter(|counter| counter.is_live(now))
            .map(|counter| (counter.count, counter.window_expiry));
        let current = live.map(|(count, _)| count).unwrap_or(0);

        if current >= limit {
            if let Some(counter) = table.entries.get_mut(identifier) {
                counter.last_touched = touch;
            }
            let retry_after = live
                .map(|(_, expiry)| expiry.saturating_duration_since(now))
                .unwrap_or(window);
            debug!(identifier = %identifier, ?retry_after, "Rate limit exceeded");
            return RateLimitResult::Limited { retry_after };
        }

        let window_expiry = match table.entries.get_mut(identifier) {
            Some(counter) if counter.is_live(now) => {
                counter.count += 1;
                counter.last_touched = touch;
                counter.window_expiry
            }
            Some(counter) => {
                *counter = WindowCounter {
                    count: 1,
                    window_expiry: now + window,
                    last_touched: touch,
                };
                counter.window_expiry
            }
            None => {
                let capacity = self.capacity();
                table.make_room(now, capacity);
                let window_expiry = now + window;
                table.entries.insert(
                    identifier.to_string(),
                    WindowCounter {
                        count: 1,
                        window_expiry,
                        last_touched: touch,
                    },
                );
                window_expiry
            }
        };

        RateLimitResult::Allowed {
            remaining: limit - (current + 1),
            reset_in: window_expiry.saturating_duration_since(now),
        }
    }

    /// Requests recorded for `identifier` in its live window.
    pub async fn count(&self, identifier: &str) -> u32 {
        let now = self.clock.now();
        let table = self.table.read().await;
        table
            .entries
            .get(identifier)
            .filter(|counter| counter.is_live(now))
            .map(|counter| counter.count)
            .unwrap_or(0)
    }

    /// Number of identifiers with a live window.
    ///
    /// Expired counters still held in the table until the next cleanup are
    /// not counted.
    pub async fn tracked(&self) -> usize {
        let now = self.clock.now();
        let table = self.table.read().await;
        table
            .entries
            .values()
            .filter(|counter| counter.is_live(now))
            .count()
    }

    /// Clean up expired entries (should be called periodically).
    pub async fn cleanup(&self) {
        let now = self.clock.now();
        let mut table = self.table.write().await;
        let before = table.entries.len();
        table.entries.retain(|_, counter| counter.is_live(now));
        let purged = before - table.entries.len();
        if purged > 0 {
            debug!(purged, remaining = table.entries.len(), "Purged expired rate counters");
        }
        if table.entries.len() >= self.capacity() {
            warn!(
                tracked = table.entries.len(),
                "Rate counter table at capacity after cleanup"
            );
        }
    }
}
