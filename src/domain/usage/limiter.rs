//! Persisted usage counter enforcing a lifetime question limit

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::storage::KeyValueStore;

/// Store key holding the usage count as a decimal string
pub const USAGE_KEY: &str = "ai_chat_usage";

/// Default number of questions allowed per store
pub const DEFAULT_USAGE_LIMIT: u32 = 10;

/// Monotonic question counter
///
/// There is no decrement; the count only goes back to zero when the
/// underlying store is cleared. This is a UX throttle, not access control.
#[derive(Debug, Clone)]
pub struct UsageLimiter {
    store: Arc<dyn KeyValueStore>,
    limit: u32,
}

impl UsageLimiter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_limit(store, DEFAULT_USAGE_LIMIT)
    }

    pub fn with_limit(store: Arc<dyn KeyValueStore>, limit: u32) -> Self {
        Self { store, limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the persisted count, 0 when missing or unreadable
    pub fn current_count(&self) -> u32 {
        match self.store.get_raw(USAGE_KEY) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|e| {
                warn!(value = %raw, error = %e, "Malformed usage count, treating as 0");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                warn!(error = %e, "Failed to read usage count, treating as 0");
                0
            }
        }
    }

    /// Adds one to the count, persists it and returns the new value
    ///
    /// Counts up from the larger of the stored count and `known`, the
    /// caller's last returned count, so a store that stops accepting writes
    /// cannot hold the count back.
    pub fn increment(&self, known: u32) -> u32 {
        let count = self.current_count().max(known).saturating_add(1);

        if let Err(e) = self.store.set_raw(USAGE_KEY, &count.to_string()) {
            warn!(error = %e, count, "Failed to persist usage count");
        }

        if self.is_blocked(count) {
            info!(count, limit = self.limit, "Usage limit reached");
        }

        count
    }

    /// Whether a count has reached the limit
    pub fn is_blocked(&self, count: u32) -> bool {
        count >= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockStore;

    #[test]
    fn test_starts_at_zero() {
        let limiter = UsageLimiter::new(Arc::new(MockStore::new()));
        assert_eq!(limiter.current_count(), 0);
        assert!(!limiter.is_blocked(0));
    }

    #[test]
    fn test_increment_persists_as_string() {
        let store = Arc::new(MockStore::new());
        let limiter = UsageLimiter::new(store.clone());

        assert_eq!(limiter.increment(0), 1);
        assert_eq!(limiter.increment(1), 2);
        assert_eq!(store.get_raw(USAGE_KEY).unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_blocked_after_ten_increments() {
        let limiter = UsageLimiter::new(Arc::new(MockStore::new()));

        let mut count = 0;
        for _ in 0..9 {
            count = limiter.increment(count);
            assert!(!limiter.is_blocked(count));
        }

        let count = limiter.increment(count);
        assert_eq!(count, 10);
        assert!(limiter.is_blocked(count));
    }

    #[test]
    fn test_reads_existing_count() {
        let store = Arc::new(MockStore::new().with_entry(USAGE_KEY, "7"));
        let limiter = UsageLimiter::new(store);

        assert_eq!(limiter.current_count(), 7);
        assert_eq!(limiter.increment(0), 8);
    }

    #[test]
    fn test_malformed_count_is_zero() {
        let store = Arc::new(MockStore::new().with_entry(USAGE_KEY, "lots"));
        let limiter = UsageLimiter::new(store);

        assert_eq!(limiter.current_count(), 0);
    }

    #[test]
    fn test_failing_store_still_returns_count() {
        let store = Arc::new(MockStore::new().with_error("read only"));
        let limiter = UsageLimiter::with_limit(store, 1);

        let count = limiter.increment(0);
        assert_eq!(count, 1);
        assert!(limiter.is_blocked(count));
    }

    #[test]
    fn test_unwritable_store_still_counts_up() {
        let store = Arc::new(
            MockStore::new()
                .with_entry(USAGE_KEY, "2")
                .with_write_error("read only"),
        );
        let limiter = UsageLimiter::new(store.clone());

        let mut count = limiter.current_count();
        for expected in 3..=10 {
            count = limiter.increment(count);
            assert_eq!(count, expected);
        }

        assert!(limiter.is_blocked(count));
        assert_eq!(store.get_raw(USAGE_KEY).unwrap(), Some("2".to_string()));
    }
}
