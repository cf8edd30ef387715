//! Expansion cache with LRU eviction and a fixed time-to-live.
//!
//! Owned by the caller and passed around explicitly; nothing in the decoder
//! or expander touches it.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use almanac_core::config::CacheConfig;
use almanac_rfc::rfc::ical::core::Occurrence;
use lru::LruCache;

use crate::error::{ServiceError, ServiceResult};
use crate::window::Window;

/// Cache key: one feed expanded over one window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub feed_key: String,
    pub window: Window,
}

impl CacheKey {
    #[must_use]
    pub fn new(feed_key: impl Into<String>, window: Window) -> Self {
        Self {
            feed_key: feed_key.into(),
            window,
        }
    }
}

/// A single cache entry with its expiry.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<Occurrence>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: Vec<Occurrence>, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Returns true once the TTL has elapsed. A zero TTL is always expired.
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Thread-safe expansion cache.
///
/// Expired entries are treated as absent and replaced on the next insert
/// for their key. Least recently used entries are evicted at capacity.
#[derive(Debug)]
pub struct ExpansionCache {
    store: Mutex<LruCache<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl ExpansionCache {
    /// ## Summary
    /// Creates a cache holding at most `max_entries` expansions for `ttl` each.
    ///
    /// ## Errors
    /// Returns `ServiceError::InvalidConfiguration` if `max_entries` is zero.
    pub fn new(max_entries: usize, ttl: Duration) -> ServiceResult<Self> {
        let capacity = NonZeroUsize::new(max_entries).ok_or_else(|| {
            ServiceError::InvalidConfiguration("cache capacity must be greater than zero".into())
        })?;

        Ok(Self {
            store: Mutex::new(LruCache::new(capacity)),
            ttl,
        })
    }

    /// ## Summary
    /// Creates a cache from the `cache` settings section.
    ///
    /// ## Errors
    /// Returns an error if the section fails validation.
    pub fn from_config(config: &CacheConfig) -> ServiceResult<Self> {
        config.validate()?;
        Self::new(config.max_entries, config.ttl())
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, CacheEntry>> {
        // Entries are plain values; a panic elsewhere cannot leave one half-written
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the live entry for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Vec<Occurrence>> {
        let mut store = self.lock();
        let entry = store.get(key)?;
        if !entry.is_expired() {
            return Some(entry.value.clone());
        }
        store.pop(key);
        None
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, value: Vec<Occurrence>) {
        self.lock().put(key, CacheEntry::new(value, self.ttl));
    }

    /// ## Summary
    /// Returns the cached value for `key` or computes and stores it.
    ///
    /// The lock is not held while `compute` runs, so two callers racing on
    /// the same key may both compute; the later insert wins.
    pub fn get_or_insert_with(
        &self,
        key: CacheKey,
        compute: impl FnOnce() -> Vec<Occurrence>,
    ) -> Vec<Occurrence> {
        if let Some(hit) = self.get(&key) {
            tracing::trace!(feed = %key.feed_key, "Expansion cache hit");
            return hit;
        }

        tracing::trace!(feed = %key.feed_key, "Expansion cache miss");
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    /// Drops every entry for `feed_key`, whatever its window.
    pub fn invalidate_feed(&self, feed_key: &str) {
        let mut store = self.lock();
        let stale: Vec<CacheKey> = store
            .iter()
            .filter(|(key, _)| key.feed_key == feed_key)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            store.pop(key);
        }
        tracing::debug!(feed = feed_key, removed = stale.len(), "Invalidated feed");
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
