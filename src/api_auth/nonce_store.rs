//! Nonce store for replay protection.
//!
//! Each (api-key, nonce) pair is accepted at most once within the retention
//! window. The in-memory backing is a DashMap whose entry API makes the
//! check-then-record step atomic per pair.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Injectable nonce registry.
pub trait NonceStore: Send + Sync {
    /// Record `nonce` for `api_key` at `now_ms`.
    ///
    /// Returns `true` if the pair was unseen (or its previous record expired),
    /// `false` if it is a replay.
    fn check_and_record(&self, api_key: &str, nonce: &str, now_ms: i64) -> bool;

    /// Evict records older than the retention window. Returns how many were removed.
    fn sweep(&self, now_ms: i64) -> usize;

    /// Number of live records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Thread-safe in-process nonce store.
pub struct InMemoryNonceStore {
    /// (api_key, nonce) -> first-seen timestamp in ms
    seen: DashMap<(String, String), i64>,
    retention_ms: i64,
}

impl InMemoryNonceStore {
    pub fn new(retention_ms: i64) -> Self {
        Self {
            seen: DashMap::new(),
            retention_ms,
        }
    }

    pub fn retention_ms(&self) -> i64 {
        self.retention_ms
    }

    fn expired(&self, first_seen: i64, now_ms: i64) -> bool {
        now_ms - first_seen > self.retention_ms
    }
}

impl NonceStore for InMemoryNonceStore {
    fn check_and_record(&self, api_key: &str, nonce: &str, now_ms: i64) -> bool {
        // entry() holds the shard write lock until the guard drops
        match self.seen.entry((api_key.to_string(), nonce.to_string())) {
            Entry::Vacant(slot) => {
                slot.insert(now_ms);
                true
            }
            Entry::Occupied(mut slot) => {
                if self.expired(*slot.get(), now_ms) {
                    slot.insert(now_ms);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn sweep(&self, now_ms: i64) -> usize {
        let before = self.seen.len();
        self.seen
            .retain(|_, first_seen| !self.expired(*first_seen, now_ms));
        before.saturating_sub(self.seen.len())
    }

    fn len(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_first_use_accepted() {
        let store = InMemoryNonceStore::new(60_000);
        assert!(store.check_and_record("key", "n1", 1000));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replay_rejected() {
        let store = InMemoryNonceStore::new(60_000);
        assert!(store.check_and_record("key", "n1", 1000));
        assert!(!store.check_and_record("key", "n1", 1001));
        assert!(!store.check_and_record("key", "n1", 61_000));
    }

    #[test]
    fn test_nonces_are_scoped_per_key() {
        let store = InMemoryNonceStore::new(60_000);
        assert!(store.check_and_record("key-a", "n1", 1000));
        assert!(store.check_and_record("key-b", "n1", 1000));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_expired_record_is_reusable() {
        let store = InMemoryNonceStore::new(60_000);
        assert!(store.check_and_record("key", "n1", 1000));
        assert!(store.check_and_record("key", "n1", 61_001));
    }

    #[test]
    fn test_sweep() {
        let store = InMemoryNonceStore::new(1000);
        assert!(store.check_and_record("key", "old", 0));
        assert!(store.check_and_record("key", "new", 1500));
        assert_eq!(store.sweep(1800), 1);
        assert_eq!(store.len(), 1);
        assert!(!store.check_and_record("key", "new", 1900));
    }

    #[test]
    fn test_concurrent_same_nonce_single_winner() {
        let store = Arc::new(InMemoryNonceStore::new(60_000));
        let accepted = Arc::new(AtomicUsize::new(0));

        let mut handles = vec![];
        for _ in 0..16 {
            let store = Arc::clone(&store);
            let accepted = Arc::clone(&accepted);
            handles.push(thread::spawn(move || {
                if store.check_and_record("key", "shared", 1000) {
                    accepted.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(accepted.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), 1);
    }
}
