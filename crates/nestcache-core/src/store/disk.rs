//! Disk storage backend.
//!
//! One JSON file per key under a cache directory. Keys are percent-encoded
//! into file names so arbitrary key strings (slashes, query strings,
//! unicode) round-trip.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::store::Storage;

#[derive(Debug)]
pub struct DiskStore {
    dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl DiskStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            quota_bytes: None,
        })
    }

    /// Open a store under the platform cache directory, e.g.
    /// `~/.cache/<app_name>` on Linux.
    pub fn open_default(app_name: &str) -> Result<Self> {
        let base = dirs::cache_dir().ok_or(StoreError::NoCacheDir)?;
        Self::open(base.join(app_name))
    }

    /// Cap the total bytes held on disk. Writes that would exceed the cap
    /// fail with [`StoreError::QuotaExceeded`].
    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }

    fn used_bytes(&self) -> Result<u64> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            total += entry?.metadata()?.len();
        }
        Ok(total)
    }
}

impl Storage for DiskStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);
        if let Some(quota) = self.quota_bytes {
            let replaced = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            let projected = self.used_bytes()? - replaced + value.len() as u64;
            if projected > quota {
                return Err(StoreError::QuotaExceeded);
            }
        }
        fs::write(&path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".json") {
                if let Ok(decoded) = urlencoding::decode(stem) {
                    keys.push(decoded.into_owned());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
