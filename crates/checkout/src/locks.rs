//! Per-session serialization of basket writes.
//!
//! Adding a product is a read-modify-write of the session's id list. Two
//! concurrent requests on one session would otherwise both read the old
//! list and the last writer would drop the other's product.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// How long an unused session lock is kept.
const DEFAULT_IDLE: Duration = Duration::from_secs(10 * 60);

/// Registry of per-session async mutexes.
///
/// Cheap to clone; clones share the registry. Entries expire after the idle
/// period, which must exceed the longest request holding a lock.
#[derive(Clone)]
pub struct BasketLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl BasketLocks {
    /// Create a registry with the default idle expiry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_idle(DEFAULT_IDLE)
    }

    /// Create a registry whose entries expire after `idle` without use.
    #[must_use]
    pub fn with_idle(idle: Duration) -> Self {
        Self {
            locks: Cache::builder().time_to_idle(idle).build(),
        }
    }

    /// Wait for exclusive access to `session_key`.
    pub async fn acquire(&self, session_key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .get_with(session_key.to_owned(), async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

impl Default for BasketLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BasketLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasketLocks")
            .field("entries", &self.locks.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = BasketLocks::new();
        let guard = locks.acquire("s1").await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let _guard = contender.acquire("s1").await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiting)
            .await
            .expect("lock released")
            .expect("task completed");
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = BasketLocks::new();
        let _first = locks.acquire("s1").await;
        tokio::time::timeout(Duration::from_secs(1), locks.acquire("s2"))
            .await
            .expect("independent session lock");
    }
}
