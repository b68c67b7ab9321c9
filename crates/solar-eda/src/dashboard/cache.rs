//! Content-addressed cache of parsed uploads.
//!
//! Uploading the same bytes twice (same file, possibly under another name)
//! reuses the parsed dataset instead of parsing the CSV again. Entries are
//! keyed by the SHA-256 digest of the bytes together with the row cap they
//! were truncated to.
//!
//! # Thread Safety
//!
//! The entry list is guarded by a `parking_lot::Mutex`, so a single cache can
//! be shared by several shells behind an `Arc`. The lock is not held while a
//! CSV is being parsed.

use super::loader::load_upload;
use crate::config::DEFAULT_CACHE_CAPACITY;
use crate::error::Result;
use parking_lot::Mutex;
use polars::prelude::DataFrame;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// LOADED UPLOAD
// ============================================================================

/// A parsed upload, truncated to the row cap but not cleaned.
#[derive(Debug, Clone)]
pub struct LoadedUpload {
    /// File name as given by the uploader.
    pub name: String,
    /// Hex SHA-256 of the uploaded bytes.
    pub digest: String,
    /// The first `row_cap` rows exactly as parsed.
    pub raw: DataFrame,
    /// Row count before truncation.
    pub rows_parsed: usize,
}

/// Hex encoded SHA-256 of `bytes`.
pub fn content_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

// ============================================================================
// CACHE
// ============================================================================

#[derive(Debug)]
struct CacheEntry {
    digest: String,
    row_cap: usize,
    upload: Arc<LoadedUpload>,
}

/// Bounded cache that keeps the most recently used uploads.
///
/// Looking up or inserting an entry moves it to the front; when the cache
/// is full the entry used longest ago is dropped.
#[derive(Debug)]
pub struct UploadCache {
    capacity: usize,
    entries: Mutex<VecDeque<CacheEntry>>,
}

impl Default for UploadCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl UploadCache {
    /// A cache holding at most `capacity` uploads (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Whether an upload with this digest is cached for any row cap.
    pub fn contains(&self, digest: &str) -> bool {
        self.entries.lock().iter().any(|e| e.digest == digest)
    }

    /// Return the cached parse of `bytes`, parsing and caching it on a miss.
    ///
    /// A hit keeps the name of the first upload of these bytes.
    pub fn get_or_load(
        &self,
        name: &str,
        bytes: &[u8],
        row_cap: usize,
    ) -> Result<Arc<LoadedUpload>> {
        let digest = content_digest(bytes);

        if let Some(upload) = self.touch(&digest, row_cap) {
            debug!("Upload cache hit for '{}' ({})", name, &digest[..12]);
            return Ok(upload);
        }

        debug!("Upload cache miss for '{}' ({})", name, &digest[..12]);
        let (raw, rows_parsed) = load_upload(name, bytes, row_cap)?;
        let upload = Arc::new(LoadedUpload {
            name: name.to_string(),
            digest: digest.clone(),
            raw,
            rows_parsed,
        });

        let mut entries = self.entries.lock();
        entries.retain(|e| !(e.digest == digest && e.row_cap == row_cap));
        entries.push_front(CacheEntry {
            digest,
            row_cap,
            upload: Arc::clone(&upload),
        });
        while entries.len() > self.capacity {
            if let Some(evicted) = entries.pop_back() {
                debug!("Evicted '{}' from upload cache", evicted.upload.name);
            }
        }

        Ok(upload)
    }

    /// Move a matching entry to the front and return it.
    fn touch(&self, digest: &str, row_cap: usize) -> Option<Arc<LoadedUpload>> {
        let mut entries = self.entries.lock();
        let pos = entries
            .iter()
            .position(|e| e.digest == digest && e.row_cap == row_cap)?;
        let entry = entries.remove(pos)?;
        let upload = Arc::clone(&entry.upload);
        entries.push_front(entry);
        Some(upload)
    }
}

static_assertions::assert_impl_all!(UploadCache: Send, Sync);
static_assertions::assert_impl_all!(LoadedUpload: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn csv(tag: usize) -> Vec<u8> {
        format!("GHI,DNI\n{tag},1\n2,3\n").into_bytes()
    }

    #[test]
    fn test_hit_returns_same_upload() {
        let cache = UploadCache::new(4);

        let first = cache.get_or_load("a.csv", &csv(1), 1000).unwrap();
        let second = cache.get_or_load("copy.csv", &csv(1), 1000).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.name, "a.csv");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_row_cap_is_part_of_the_key() {
        let cache = UploadCache::new(4);
        let capped = cache.get_or_load("a.csv", &csv(1), 1).unwrap();
        let full = cache.get_or_load("a.csv", &csv(1), 1000).unwrap();

        assert_eq!(capped.raw.height(), 1);
        assert_eq!(full.raw.height(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = UploadCache::new(2);
        cache.get_or_load("1.csv", &csv(1), 1000).unwrap();
        cache.get_or_load("2.csv", &csv(2), 1000).unwrap();
        // touching 1 makes 2 the oldest
        cache.get_or_load("1.csv", &csv(1), 1000).unwrap();
        cache.get_or_load("3.csv", &csv(3), 1000).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&content_digest(&csv(1))));
        assert!(!cache.contains(&content_digest(&csv(2))));
        assert!(cache.contains(&content_digest(&csv(3))));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let cache = UploadCache::default();
        assert!(cache.get_or_load("empty.csv", b"", 1000).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_content_digest() {
        assert_eq!(
            content_digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
