//! Cache configuration.
//!
//! Holds the knobs shared by every entry the manager writes: the default
//! TTL, the capacity bound, and the version stamp used for bulk
//! invalidation after a data-shape change.

use chrono::Duration;

/// Default entry lifetime in hours.
const DEFAULT_TTL_HOURS: i64 = 24;

/// Default capacity bound.
const DEFAULT_MAX_ITEMS: usize = 100;

/// Default version stamp.
const DEFAULT_VERSION: &str = "1.0";

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Lifetime applied to entries written without an explicit TTL.
    pub ttl: Duration,
    /// Maximum number of entries kept in the namespace.
    pub max_items: usize,
    /// Version stamp copied onto every entry at write time. Entries
    /// stamped with any other value are treated as absent on read.
    pub version: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
            max_items: DEFAULT_MAX_ITEMS,
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

impl CacheConfig {
    /// Merge a partial update over the current configuration. Fields left
    /// unset keep their prior values.
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(ttl) = update.ttl {
            self.ttl = ttl;
        }
        if let Some(max_items) = update.max_items {
            self.max_items = max_items;
        }
        if let Some(version) = update.version {
            self.version = version;
        }
    }
}

/// Partial configuration overlay for
/// [`CacheManager::configure`](crate::CacheManager::configure).
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub ttl: Option<Duration>,
    pub max_items: Option<usize>,
    pub version: Option<String>,
}
