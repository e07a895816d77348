use dashmap::DashMap;
use std::future::Future;
use std::time::{Duration, Instant};

/// A thread-safe cache of upstream responses with a fixed TTL and a bounded
/// number of entries.
pub struct Cache<V> {
    data: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    capacity: usize,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V: Clone> Cache<V> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Get a live value. Expired entries are evicted on read.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    /// Insert or refresh `key`. A new key on a full cache first drops expired
    /// entries, then the oldest live ones.
    pub fn insert(&self, key: String, value: V) {
        if !self.data.contains_key(&key) && self.data.len() >= self.capacity {
            self.make_room();
        }
        self.data.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Return the cached value for `key`, or run `fetch` and cache its success.
    ///
    /// Errors are passed through and never cached. Concurrent misses on the
    /// same key may both fetch; the last one to finish wins.
    pub async fn get_or_try_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let value = fetch().await?;
        self.insert(key.to_string(), value.clone());
        Ok(value)
    }

    fn make_room(&self) {
        self.cleanup();
        while self.data.len() >= self.capacity {
            let oldest = self
                .data
                .iter()
                .min_by_key(|entry| entry.expires_at)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    self.data.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Drop every expired entry.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
