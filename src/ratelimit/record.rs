//! Fixed-window rate limit record.

use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Default number of requests admitted per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 60;
/// Default window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// How many requests one identity may make per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitPolicy {
    /// Maximum requests admitted in one window
    pub max_requests: u32,
    /// Length of the window
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

/// Outcome of a single rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests left in the current window
    pub remaining: u32,
    /// The configured per-window limit
    pub limit: u32,
    /// Time left until the current window resets
    pub retry_after: Duration,
}

impl Decision {
    /// Seconds until the window resets, rounded up and never zero.
    pub fn retry_after_secs(&self) -> u64 {
        let whole = self.retry_after.as_secs();
        let partial = u64::from(self.retry_after.subsec_nanos() > 0);
        (whole + partial).max(1)
    }
}

/// Request count for one identity within its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    count: u32,
    reset_time: Instant,
}

impl RateLimitRecord {
    /// Open a fresh window for an identity's first request.
    ///
    /// A policy admitting zero requests rejects it, leaving the count at 0.
    pub fn open(now: Instant, policy: &RateLimitPolicy) -> (Self, Decision) {
        let mut record = Self {
            count: 0,
            reset_time: now + policy.window,
        };
        let decision = record.hit(now, policy);
        (record, decision)
    }

    /// Account for one more request and decide whether it is admitted.
    ///
    /// A rejected request leaves the record untouched.
    pub fn hit(&mut self, now: Instant, policy: &RateLimitPolicy) -> Decision {
        if self.is_expired(now) {
            let (fresh, decision) = Self::open(now, policy);
            *self = fresh;
            return decision;
        }

        if self.count >= policy.max_requests {
            return Decision {
                allowed: false,
                remaining: 0,
                limit: policy.max_requests,
                retry_after: self.until_reset(now),
            };
        }

        self.count += 1;
        self.admitted(now, policy)
    }

    /// The window has ended; the next request starts a new one.
    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.reset_time
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset_time(&self) -> Instant {
        self.reset_time
    }

    fn admitted(&self, now: Instant, policy: &RateLimitPolicy) -> Decision {
        Decision {
            allowed: true,
            remaining: policy.max_requests.saturating_sub(self.count),
            limit: policy.max_requests,
            retry_after: self.until_reset(now),
        }
    }

    fn until_reset(&self, now: Instant) -> Duration {
        self.reset_time.saturating_duration_since(now)
    }
}
