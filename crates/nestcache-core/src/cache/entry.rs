//! Cache entry envelope.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The envelope persisted for every cached value.
///
/// Serialized as JSON under a namespaced key. `timestamp` drives both TTL
/// expiry and eviction order; `version` ties the entry to the
/// configuration that wrote it, so bumping the configured version
/// invalidates old entries without rewriting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
    /// Entry lifetime in milliseconds.
    #[serde(rename = "ttl")]
    pub ttl_ms: i64,
    pub version: String,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, ttl: Duration, version: impl Into<String>) -> Self {
        Self {
            data,
            timestamp: Utc::now(),
            ttl_ms: ttl.num_milliseconds(),
            version: version.into(),
        }
    }

    /// Time elapsed since the entry was written. Negative under clock
    /// skew, which the expiry check tolerates.
    pub fn age(&self) -> Duration {
        Utc::now() - self.timestamp
    }

    /// An entry expires once its age strictly exceeds its TTL; a read at
    /// exactly `timestamp + ttl` still yields the value.
    pub fn is_expired(&self) -> bool {
        self.age() > Duration::milliseconds(self.ttl_ms)
    }

    pub fn matches_version(&self, version: &str) -> bool {
        self.version == version
    }

    /// Current-version and not expired. Anything else reads as absent.
    pub fn is_valid(&self, version: &str) -> bool {
        self.matches_version(version) && !self.is_expired()
    }
}

/// Timestamp-only view of a stored envelope, used to order entries for
/// eviction without deserializing payloads.
#[derive(Debug, Deserialize)]
pub(crate) struct EntryStamp {
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stamps_ttl_and_version() {
        let entry = CacheEntry::new(vec![1, 2, 3], Duration::minutes(5), "1.0");

        assert_eq!(entry.data, vec![1, 2, 3]);
        assert_eq!(entry.ttl_ms, 300_000);
        assert_eq!(entry.version, "1.0");
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_is_expired_after_ttl() {
        let mut entry = CacheEntry::new("v", Duration::seconds(60), "1.0");

        entry.timestamp = Utc::now() - Duration::seconds(59);
        assert!(!entry.is_expired());

        entry.timestamp = Utc::now() - Duration::seconds(61);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_clock_skew_reads_as_fresh() {
        let mut entry = CacheEntry::new("v", Duration::seconds(60), "1.0");
        entry.timestamp = Utc::now() + Duration::seconds(30);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_is_valid_checks_version_and_expiry() {
        let mut entry = CacheEntry::new("v", Duration::seconds(60), "1.0");

        assert!(entry.is_valid("1.0"));
        assert!(!entry.is_valid("2.0"));

        entry.timestamp = Utc::now() - Duration::seconds(61);
        assert!(!entry.is_valid("1.0"));
    }

    #[test]
    fn test_envelope_field_names() {
        let entry = CacheEntry::new(7, Duration::seconds(1), "1.0");
        let json = serde_json::to_value(&entry).unwrap();

        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("data"));
        assert!(obj.contains_key("timestamp"));
        assert!(obj.contains_key("ttl"));
        assert!(obj.contains_key("version"));
        assert_eq!(obj["ttl"], 1000);
    }
}
