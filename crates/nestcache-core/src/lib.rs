//! Durable, bounded, TTL-aware key-value caching for client applications.
//!
//! `nestcache` keeps expensive fetch results (search responses, profile
//! lookups, listing data) across runs so repeat visits start warm. The
//! manager layers TTL expiry, version invalidation, and a capacity bound
//! with oldest-write-first eviction over a pluggable storage backend, and
//! an async fetch-through helper covers the cache-miss path:
//!
//! - [`CacheManager`]: `set` / `get` / `remove` / `clear` / `clear_oldest`
//!   / `preload`
//! - [`MemoryStore`]: map-backed storage for tests and short-lived use
//! - [`DiskStore`]: one JSON file per key under the platform cache dir
//!
//! Cache failures never propagate to callers: a full or broken backend
//! degrades to "always miss", which every caller already handles as the
//! cold-cache case.

pub mod cache;
pub mod config;
pub mod error;
pub mod store;

pub use cache::{CacheEntry, CacheManager};
pub use config::{CacheConfig, ConfigUpdate};
pub use error::StoreError;
pub use store::{DiskStore, MemoryStore, Storage};
