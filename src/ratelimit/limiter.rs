//! Core rate limiter implementation.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

use super::identity::ClientIdentity;
use super::record::{Decision, RateLimitPolicy};
use super::store::{InMemoryStore, RateLimitStore};

/// Fixed-window rate limiter keyed by client identity.
///
/// The limiter owns no global state: each instance carries its own store,
/// so tests and separate routers never share quotas.
pub struct RateLimiter {
    /// Record storage
    store: Arc<dyn RateLimitStore>,
    /// Admission policy applied to every identity
    policy: RateLimitPolicy,
}

impl RateLimiter {
    /// Create a rate limiter backed by a bounded in-memory store.
    pub fn new(policy: RateLimitPolicy, max_entries: usize) -> Self {
        Self::with_store(Arc::new(InMemoryStore::new(max_entries)), policy)
    }

    /// Create a rate limiter over an existing store.
    pub fn with_store(store: Arc<dyn RateLimitStore>, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }

    /// Check and count one request for `identity`.
    pub async fn check_rate_limit(&self, identity: &ClientIdentity) -> Decision {
        let key = identity.store_key();
        trace!(key = %key, "Checking rate limit");

        let decision = self.store.hit(&key, Instant::now(), &self.policy).await;

        if !decision.allowed {
            debug!(
                key = %key,
                limit = decision.limit,
                retry_after_secs = decision.retry_after_secs(),
                "Rate limit exceeded"
            );
        }

        decision
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Number of identities currently tracked.
    pub async fn tracked_identities(&self) -> usize {
        self.store.len().await
    }

    /// Drop records whose window has ended.
    pub async fn sweep(&self) -> usize {
        self.store.evict_expired(Instant::now()).await
    }

    /// Periodically sweep expired records until the returned task is aborted.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        info!(interval_secs = interval.as_secs(), "Starting rate limit sweeper");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let removed = limiter.sweep().await;
                if removed > 0 {
                    debug!(removed, "Swept expired rate limit records");
                }
            }
        })
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::with_store(Arc::new(InMemoryStore::default()), RateLimitPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32) -> RateLimiter {
        RateLimiter::new(RateLimitPolicy::new(max, Duration::from_secs(60)), 100)
    }

    #[tokio::test(start_paused = true)]
    async fn test_admits_exactly_max_requests() {
        let limiter = RateLimiter::default();
        let identity = ClientIdentity::new("203.0.113.7");

        let mut remaining = Vec::new();
        for _ in 0..60 {
            let decision = limiter.check_rate_limit(&identity).await;
            assert!(decision.allowed);
            remaining.push(decision.remaining);
        }
        assert_eq!(remaining.first(), Some(&59));
        assert_eq!(remaining.last(), Some(&0));
        assert!(remaining.windows(2).all(|w| w[0] > w[1]));

        let decision = limiter.check_rate_limit(&identity).await;
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(decision.retry_after_secs(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_reset_restores_quota() {
        let limiter = limiter(3);
        let identity = ClientIdentity::new("client");

        for _ in 0..3 {
            assert!(limiter.check_rate_limit(&identity).await.allowed);
        }
        assert!(!limiter.check_rate_limit(&identity).await.allowed);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(!limiter.check_rate_limit(&identity).await.allowed);

        tokio::time::advance(Duration::from_millis(1)).await;
        let decision = limiter.check_rate_limit(&identity).await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identities_are_isolated() {
        let limiter = limiter(2);
        let alice = ClientIdentity::new("198.51.100.1");
        let bob = ClientIdentity::new("198.51.100.2");

        for _ in 0..2 {
            assert!(limiter.check_rate_limit(&alice).await.allowed);
        }
        assert!(!limiter.check_rate_limit(&alice).await.allowed);

        for _ in 0..2 {
            assert!(limiter.check_rate_limit(&bob).await.allowed);
        }
        assert!(!limiter.check_rate_limit(&bob).await.allowed);
        assert_eq!(limiter.tracked_identities().await, 2);
    }

    #[tokio::test]
    async fn test_separate_limiters_do_not_share_state() {
        let first = limiter(1);
        let second = limiter(1);
        let identity = ClientIdentity::new("shared");

        assert!(first.check_rate_limit(&identity).await.allowed);
        assert!(!first.check_rate_limit(&identity).await.allowed);
        assert!(second.check_rate_limit(&identity).await.allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_expired_identities() {
        let limiter = limiter(5);
        limiter.check_rate_limit(&ClientIdentity::new("a")).await;
        limiter.check_rate_limit(&ClientIdentity::new("b")).await;

        assert_eq!(limiter.sweep().await, 0);
        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(limiter.sweep().await, 2);
        assert_eq!(limiter.tracked_identities().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_task_evicts_in_background() {
        let limiter = Arc::new(limiter(5));
        limiter.check_rate_limit(&ClientIdentity::new("a")).await;

        let sweeper = limiter.spawn_sweeper(Duration::from_secs(30));
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        assert_eq!(limiter.tracked_identities().await, 1);

        tokio::time::advance(Duration::from_secs(91)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert_eq!(limiter.tracked_identities().await, 0);
        sweeper.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_hits_are_not_lost() {
        let limiter = Arc::new(limiter(1000));
        let identity = ClientIdentity::new("burst");

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let identity = identity.clone();
                tokio::spawn(async move {
                    for _ in 0..50 {
                        limiter.check_rate_limit(&identity).await;
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let decision = limiter.check_rate_limit(&identity).await;
        assert_eq!(decision.remaining, 1000 - 401);
    }
}
