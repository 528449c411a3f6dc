//! Storage seam for rate limit records.

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use tokio::time::Instant;
use tracing::debug;

use super::record::{Decision, RateLimitPolicy, RateLimitRecord};

/// Default upper bound on tracked identities.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Trait for rate limit record stores.
///
/// `hit` performs the whole check-and-count transition for one key as a
/// single atomic step, so an implementation backed by a shared external store
/// can be swapped in without touching callers.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one request for `key` and decide whether it is admitted.
    async fn hit(&self, key: &str, now: Instant, policy: &RateLimitPolicy) -> Decision;

    /// Drop every record whose window ended before `now`.
    async fn evict_expired(&self, now: Instant) -> usize;

    /// Number of tracked keys.
    async fn len(&self) -> usize;
}

/// Process-local store with a bounded number of records.
///
/// Records are kept in least-recently-used order. Every check touches the
/// caller's record, rejected ones included, so a client that keeps sending
/// stays resident; at capacity the identity idle the longest is dropped.
pub struct InMemoryStore {
    records: Mutex<LruCache<String, RateLimitRecord>>,
    max_entries: NonZeroUsize,
}

impl InMemoryStore {
    pub fn new(max_entries: usize) -> Self {
        let max_entries = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            records: Mutex::new(LruCache::new(max_entries)),
            max_entries,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries.get()
    }

    /// Current count for a key, if it is tracked.
    pub fn count(&self, key: &str) -> Option<u32> {
        self.records.lock().peek(key).map(|r| r.count())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[async_trait]
impl RateLimitStore for InMemoryStore {
    async fn hit(&self, key: &str, now: Instant, policy: &RateLimitPolicy) -> Decision {
        let mut records = self.records.lock();
        if let Some(record) = records.get_mut(key) {
            return record.hit(now, policy);
        }

        let (record, decision) = RateLimitRecord::open(now, policy);
        if let Some((evicted, _)) = records.push(key.to_string(), record) {
            debug!(key = %evicted, "Evicting idle rate limit record at capacity");
        }
        decision
    }

    async fn evict_expired(&self, now: Instant) -> usize {
        let mut records = self.records.lock();
        let expired: Vec<String> = records
            .iter()
            .filter(|(_, record)| record.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            records.pop(key);
        }
        expired.len()
    }

    async fn len(&self) -> usize {
        self.records.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn policy() -> RateLimitPolicy {
        RateLimitPolicy::new(2, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_store_creates_record_lazily() {
        let store = InMemoryStore::default();
        assert_eq!(store.len().await, 0);

        let decision = store.hit("rate-limit:a", Instant::now(), &policy()).await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.count("rate-limit:a"), Some(1));
    }

    #[tokio::test]
    async fn test_store_evicts_expired_records() {
        let store = InMemoryStore::default();
        let start = Instant::now();

        store.hit("a", start, &policy()).await;
        store.hit("b", start + Duration::from_secs(30), &policy()).await;

        let removed = store.evict_expired(start + Duration::from_secs(61)).await;
        assert_eq!(removed, 1);
        assert_eq!(store.count("a"), None);
        assert_eq!(store.count("b"), Some(1));
    }

    #[tokio::test]
    async fn test_store_capacity_drops_least_recently_seen() {
        let store = InMemoryStore::new(2);
        let start = Instant::now();

        store.hit("first", start, &policy()).await;
        store.hit("second", start + Duration::from_secs(1), &policy()).await;
        store.hit("first", start + Duration::from_secs(2), &policy()).await;
        store.hit("third", start + Duration::from_secs(3), &policy()).await;

        assert_eq!(store.len().await, 2);
        assert_eq!(store.count("first"), Some(2));
        assert_eq!(store.count("second"), None);
        assert_eq!(store.count("third"), Some(1));
    }

    #[tokio::test]
    async fn test_throttled_identity_survives_churn_at_capacity() {
        let store = InMemoryStore::new(2);
        let start = Instant::now();
        let at = |secs| start + Duration::from_secs(secs);

        assert!(store.hit("blocked", at(0), &policy()).await.allowed);
        assert!(store.hit("blocked", at(0), &policy()).await.allowed);
        assert!(!store.hit("blocked", at(1), &policy()).await.allowed);

        store.hit("rotating-1", at(2), &policy()).await;
        assert!(!store.hit("blocked", at(3), &policy()).await.allowed);
        store.hit("rotating-2", at(4), &policy()).await;

        let decision = store.hit("blocked", at(5), &policy()).await;
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(store.count("blocked"), Some(2));
        assert_eq!(store.count("rotating-1"), None);
    }

    #[test]
    fn test_zero_capacity_holds_one_record() {
        assert_eq!(InMemoryStore::new(0).max_entries(), 1);
    }

    #[tokio::test]
    async fn test_known_key_never_triggers_eviction() {
        let store = InMemoryStore::new(1);
        let start = Instant::now();

        store.hit("only", start, &policy()).await;
        let decision = store.hit("only", start, &policy()).await;

        assert!(decision.allowed);
        assert_eq!(store.count("only"), Some(2));
    }
}
