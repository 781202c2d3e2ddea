//! Cache management module.
//!
//! This module provides the `CacheManager` for keeping expensive fetch
//! results in a `Storage` backend. Entries are stored as JSON envelopes
//! carrying a write timestamp, a TTL, and a version stamp:
//!
//! - expired or version-mismatched entries read as misses and are
//!   removed lazily
//! - the capacity bound evicts oldest-write-first (FIFO, not LRU)
//! - a full backend triggers evict-half-and-retry recovery

pub mod entry;
pub mod manager;

pub use entry::CacheEntry;
pub use manager::CacheManager;
