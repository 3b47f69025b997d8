//! On-disk cache of full query results, one JSON file per query.
//!
//! Files are named by the SHA-256 of the query's canonical string, so the
//! same filters and fields always land in the same file. Entries never
//! expire; remove them with [`DiskCache::clear`] or by hand.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hex::ToHex;
use scorecard_api::types::RawRecord;
use scorecard_api::Query;
use sha2::{Digest, Sha256};

use crate::error::ScoutError;

/// Hex-encoded SHA-256 digest of a canonical query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_query(query: &impl Query) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(query.canonical().as_bytes());
        Self(hasher.finalize().encode_hex::<String>())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File-per-key result cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Creates a cache rooted at `dir`. The directory is created on first store.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, query: &impl Query) -> PathBuf {
        self.dir
            .join(format!("{}.json", CacheKey::for_query(query)))
    }

    /// Returns the cached records for `query`, or `None` on a miss.
    ///
    /// Unreadable or malformed files count as a miss and are logged.
    pub fn lookup(&self, query: &impl Query) -> Option<Vec<RawRecord>> {
        let path = self.path_for(query);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache file {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str::<Vec<RawRecord>>(contents.trim()) {
            Ok(records) => Some(records),
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Writes the full record list for `query`, replacing any previous entry.
    pub fn store(&self, query: &impl Query, records: &[RawRecord]) -> Result<(), ScoutError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            ScoutError::Cache(format!("failed to create {}: {}", self.dir.display(), e))
        })?;
        let path = self.path_for(query);
        let json = serde_json::to_string(records)?;
        fs::write(&path, json)
            .map_err(|e| ScoutError::Cache(format!("failed to write {}: {}", path.display(), e)))?;
        tracing::debug!("Cached {} records in {}", records.len(), path.display());
        Ok(())
    }

    /// Removes every cache entry, returning how many files were deleted.
    pub fn clear(&self) -> Result<usize, ScoutError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(ScoutError::Cache(format!(
                    "failed to read {}: {}",
                    self.dir.display(),
                    e
                )))
            }
        };
        let mut removed = 0;
        for entry in entries {
            let path = entry
                .map_err(|e| ScoutError::Cache(e.to_string()))?
                .path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).map_err(|e| {
                    ScoutError::Cache(format!("failed to remove {}: {}", path.display(), e))
                })?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use scorecard_api::SchoolQuery;
    use serde_json::json;

    use super::*;

    fn query() -> SchoolQuery {
        SchoolQuery::default()
            .with_filter("school.operating", 1)
            .with_filter("latest.student.size__range", "500..")
            .with_fields(&["school.name", "school.city"])
    }

    fn records() -> Vec<RawRecord> {
        vec![
            [
                ("school.name", json!("Rice University")),
                ("school.city", json!("Houston")),
            ]
            .into_iter()
            .collect(),
            [
                ("school.name", json!("Reed College")),
                ("school.city", json!(null)),
            ]
            .into_iter()
            .collect(),
        ]
    }

    #[test]
    fn key_is_sha256_hex() {
        let key = CacheKey::for_query(&query());
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn key_ignores_filter_order() {
        let reordered = SchoolQuery::default()
            .with_filter("latest.student.size__range", "500..")
            .with_filter("school.operating", 1)
            .with_fields(&["school.name", "school.city"]);
        assert_eq!(CacheKey::for_query(&query()), CacheKey::for_query(&reordered));
    }

    #[test]
    fn key_differs_for_different_queries() {
        let other = query().with_filter("school.state", "TX");
        assert_ne!(CacheKey::for_query(&query()), CacheKey::for_query(&other));
    }

    #[test]
    fn store_then_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path().join("cache"));
        assert_eq!(cache.lookup(&query()), None);

        cache.store(&query(), &records()).unwrap();
        assert_eq!(cache.lookup(&query()), Some(records()));
    }

    #[test]
    fn store_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());
        cache.store(&query(), &[]).unwrap();
        assert_eq!(cache.lookup(&query()), Some(vec![]));
    }

    #[test]
    fn store_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());
        cache.store(&query(), &records()).unwrap();
        let first = fs::read(cache.path_for(&query())).unwrap();
        cache.store(&query(), &records()).unwrap();
        let second = fs::read(cache.path_for(&query())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());
        cache.store(&query(), &records()).unwrap();
        cache.store(&query(), &records()[..1]).unwrap();
        assert_eq!(cache.lookup(&query()).unwrap().len(), 1);
    }

    #[test]
    fn corrupt_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());
        fs::write(cache.path_for(&query()), "[{\"school.name\": ").unwrap();
        assert_eq!(cache.lookup(&query()), None);

        fs::write(cache.path_for(&query()), "{\"not\": \"a list\"}").unwrap();
        assert_eq!(cache.lookup(&query()), None);
    }

    #[test]
    fn clear_removes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());
        cache.store(&query(), &records()).unwrap();
        cache
            .store(&query().with_filter("school.state", "TX"), &[])
            .unwrap();
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert_eq!(cache.lookup(&query()), None);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn clear_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path().join("never-created"));
        assert_eq!(cache.clear().unwrap(), 0);
    }
}
