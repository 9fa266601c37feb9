//! # Rate Limit Guard
//!
//! Per-actor throttle over noisy free-text submissions. An actor gets a
//! `burst` allowance with no enforced spacing; after that, an action is
//! allowed only when at least `interval` has elapsed since the last
//! allowed action. Denials never reset the window.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::types::UserId;

#[derive(Debug, Clone, Copy)]
struct GuardEntry {
    used: u32,
    last_allowed: Instant,
}

pub struct RateLimitGuard {
    interval: Duration,
    burst: u32,
    entries: Mutex<HashMap<UserId, GuardEntry>>,
}

impl RateLimitGuard {
    pub fn new(interval: Duration, burst: u32) -> Self {
        Self {
            interval,
            burst,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_seconds(interval_secs: f64, burst: u32) -> Self {
        Self::new(Duration::from_secs_f64(interval_secs.max(0.0)), burst)
    }

    /// Whether the actor may act now. Allowed actions consume burst
    /// allowance first, then require `interval` spacing.
    pub async fn is_allowed(&self, actor: UserId) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(actor).or_insert(GuardEntry {
            used: 0,
            last_allowed: now,
        });

        if entry.used < self.burst {
            entry.used += 1;
            entry.last_allowed = now;
            return true;
        }

        if now.duration_since(entry.last_allowed) >= self.interval {
            entry.last_allowed = now;
            return true;
        }

        false
    }
}
