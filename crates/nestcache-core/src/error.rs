//! Error types for the storage backends.
//!
//! `StoreError` circulates between a [`Storage`](crate::store::Storage)
//! backend and the cache manager; it never crosses the manager's public
//! surface. The manager reports `set` outcomes as a boolean and misses as
//! `None`, so callers need no error handling on the cache path.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend refused a write for capacity reasons.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// Disk backend I/O failure.
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The platform cache directory could not be determined.
    #[error("could not determine a cache directory")]
    NoCacheDir,
}

/// Convenience Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
