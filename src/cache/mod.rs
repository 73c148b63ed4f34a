// src/cache/mod.rs
pub mod policy;

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// In-memory TTL cache shared by every read path.
///
/// Entries are evicted lazily: an expired entry is removed by the next `get`
/// that observes it, there is no background sweep. Writes overwrite
/// unconditionally (last write wins when callers race). No size bound; this is
/// sized for a handful of endpoint keys, not a general-purpose cache.
pub struct ExpiringCache<V> {
    store: RwLock<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> ExpiringCache<V> {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the stored value iff its expiry is strictly in the future.
    /// An entry observed as expired is removed during the call.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let guard = self.store.read().expect("cache rwlock poisoned");
            match guard.get(key) {
                None => return None,
                Some((expires_at, value)) => {
                    if Instant::now() < *expires_at {
                        return Some(value.clone());
                    }
                }
            }
        }
        // Expired: upgrade to a write lock and drop the entry. Re-check under
        // the write lock so a racing overwrite is not discarded.
        let mut guard = self.store.write().expect("cache rwlock poisoned");
        if let Some((expires_at, _)) = guard.get(key) {
            if Instant::now() < *expires_at {
                return guard.get(key).map(|(_, v)| v.clone());
            }
            guard.remove(key);
        }
        None
    }

    /// Stores `value` under `key` with expiry = now + `ttl`, overwriting any
    /// prior entry. `Duration::ZERO` means immediately expired for subsequent
    /// reads.
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        let mut guard = self.store.write().expect("cache rwlock poisoned");
        guard.insert(key.to_string(), (expires_at, value));
    }

    pub fn clear(&self) {
        let mut guard = self.store.write().expect("cache rwlock poisoned");
        guard.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.store.read().expect("cache rwlock poisoned").len()
    }
}

impl<V: Clone> Default for ExpiringCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
