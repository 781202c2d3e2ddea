//! Durable bounded cache manager.
//!
//! `CacheManager` layers TTL expiry, version invalidation, and a capacity
//! bound with oldest-write-first eviction over a [`Storage`] backend, and
//! adds an async fetch-through helper for the cache-miss path.
//!
//! Nothing here ever panics or returns an error to the caller: the cache
//! is an optimization, and every fault degrades to a miss.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::entry::{CacheEntry, EntryStamp};
use crate::config::{CacheConfig, ConfigUpdate};
use crate::error::StoreError;
use crate::store::Storage;

/// Namespace prefix for keys written by the manager. Keeps cache entries
/// apart from unrelated data sharing the same backend.
const CACHE_PREFIX: &str = "nestcache_";

pub struct CacheManager<S: Storage> {
    store: S,
    config: CacheConfig,
    prefix: String,
}

impl<S: Storage> CacheManager<S> {
    /// Manager with the default configuration and namespace prefix.
    pub fn new(store: S) -> Self {
        Self::with_config(store, CacheConfig::default())
    }

    pub fn with_config(store: S, config: CacheConfig) -> Self {
        Self {
            store,
            config,
            prefix: CACHE_PREFIX.to_string(),
        }
    }

    /// Manager with a custom namespace prefix, for callers sharing one
    /// backend between several caches.
    pub fn with_prefix(store: S, config: CacheConfig, prefix: impl Into<String>) -> Self {
        Self {
            store,
            config,
            prefix: prefix.into(),
        }
    }

    /// Merge a partial configuration update over the current one.
    ///
    /// Stored entries are not rewritten; each is re-evaluated against the
    /// new configuration on its next read. Bumping `version` therefore
    /// invalidates the whole namespace without a bulk pass.
    pub fn configure(&mut self, update: ConfigUpdate) {
        self.config.apply(update);
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The underlying storage backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Core operations
    // =========================================================================

    /// Store `data` under `key`, evicting the oldest entry first when the
    /// namespace is at capacity.
    ///
    /// Returns whether the value was written. A full backend triggers one
    /// recovery attempt (evict the oldest half, retry); past that the
    /// write is abandoned and `false` comes back.
    pub fn set<T: Serialize>(&mut self, key: &str, data: &T, ttl: Option<Duration>) -> bool {
        if key.is_empty() {
            warn!("rejected cache write with empty key");
            return false;
        }
        if let Some(ttl) = ttl {
            if ttl <= Duration::zero() {
                warn!(key, "rejected cache write with non-positive ttl");
                return false;
            }
        }

        let entry = CacheEntry::new(
            data,
            ttl.unwrap_or(self.config.ttl),
            self.config.version.clone(),
        );
        let payload = match serde_json::to_string(&entry) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache entry");
                return false;
            }
        };

        // Make room before writing. Counts physical keys, so expired
        // entries still occupy a slot until lazily collected.
        if self.live_keys().len() >= self.config.max_items {
            self.clear_oldest(1);
        }

        let cache_key = self.namespaced(key);
        match self.store.set(&cache_key, &payload) {
            Ok(()) => true,
            Err(StoreError::QuotaExceeded) => {
                debug!(key, "storage quota exceeded, evicting oldest half");
                self.clear_oldest(self.config.max_items / 2);
                match self.store.set(&cache_key, &payload) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(key, error = %e, "cache write abandoned after retry");
                        false
                    }
                }
            }
            Err(e) => {
                warn!(key, error = %e, "cache write failed");
                false
            }
        }
    }

    /// Read the value cached under `key`.
    ///
    /// Entries that fail to parse, were written under a different
    /// version, or have outlived their TTL are removed on the spot and
    /// read as a miss. Callers cannot tell expiry apart from absence.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let cache_key = self.namespaced(key);
        let raw = match self.store.get(&cache_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                debug!(key, error = %e, "cache read failed");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(key, error = %e, "removing unreadable cache entry");
                self.remove(key);
                return None;
            }
        };

        if !entry.is_valid(&self.config.version) {
            debug!(key, "removing stale cache entry");
            self.remove(key);
            return None;
        }

        Some(entry.data)
    }

    /// Delete the entry under `key`. No-op if absent.
    pub fn remove(&mut self, key: &str) {
        let cache_key = self.namespaced(key);
        if let Err(e) = self.store.remove(&cache_key) {
            debug!(key, error = %e, "cache remove failed");
        }
    }

    /// Delete every entry in the namespace, leaving unrelated keys in the
    /// backend untouched.
    pub fn clear(&mut self) {
        for key in self.live_keys() {
            self.remove(&key);
        }
    }

    /// Delete the `count` oldest entries by write time, or everything if
    /// `count` exceeds the live population. The quota recovery path uses
    /// this; callers can too, for manual pressure relief.
    pub fn clear_oldest(&mut self, count: usize) {
        let mut stamped = self.stamped_keys();
        stamped.sort_by_key(|(_, timestamp)| *timestamp);
        for (key, _) in stamped.into_iter().take(count) {
            self.remove(&key);
        }
    }

    /// Number of entries currently held, expired-but-uncollected included.
    pub fn len(&self) -> usize {
        self.live_keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Fetch-through
    // =========================================================================

    /// Fetch-through read: return the cached value on a hit without
    /// invoking `fetch`; otherwise await `fetch`, cache its result, and
    /// return it.
    ///
    /// A failed fetch is logged and read as `None`, so call sites treat
    /// it exactly like a cold-cache miss instead of wrapping every call
    /// in error handling. A failed cache write still returns the fetched
    /// value. Overlapping calls for the same key are not coalesced; each
    /// runs its own fetch and the last completed write wins.
    pub async fn preload<T, F, Fut>(
        &mut self,
        key: &str,
        fetch: F,
        ttl: Option<Duration>,
    ) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        if let Some(cached) = self.get::<T>(key) {
            return Some(cached);
        }

        match fetch().await {
            Ok(data) => {
                self.set(key, &data, ttl);
                Some(data)
            }
            Err(e) => {
                warn!(key, error = %e, "preload fetch failed");
                None
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Un-prefixed keys currently present in the namespace.
    fn live_keys(&self) -> Vec<String> {
        match self.store.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter_map(|k| k.strip_prefix(&self.prefix).map(str::to_string))
                .collect(),
            Err(e) => {
                debug!(error = %e, "cache key enumeration failed");
                Vec::new()
            }
        }
    }

    /// Live keys paired with their write timestamps. Entries whose
    /// envelope no longer parses sort as oldest, so corruption is
    /// reclaimed first. Backends enumerate in sorted order and the sort
    /// in `clear_oldest` is stable, so timestamp ties break
    /// deterministically by key order.
    fn stamped_keys(&self) -> Vec<(String, DateTime<Utc>)> {
        self.live_keys()
            .into_iter()
            .map(|key| {
                let stamp = self
                    .store
                    .get(&self.namespaced(&key))
                    .ok()
                    .flatten()
                    .and_then(|raw| serde_json::from_str::<EntryStamp>(&raw).ok())
                    .map(|meta| meta.timestamp)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                (key, stamp)
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
