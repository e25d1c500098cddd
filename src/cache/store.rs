//! The authoritative identifier → record store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cache::index::{InvertedIndex, Slot};
use crate::cache::CacheError;
use crate::hash::{FuzzyHash, MalformedHashError};

/// Policy for handling malformed entries during a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadPolicy {
    /// Abort the whole load on the first bad entry, leaving the cache
    /// untouched.
    #[default]
    FailFast,
    /// Skip bad entries and keep loading the rest.
    SkipMalformed,
}

/// Statistics from a bulk load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of records inserted
    pub loaded: usize,
    /// Number of entries skipped under [`LoadPolicy::SkipMalformed`]
    pub skipped: usize,
    /// Wall-clock duration of the load
    pub elapsed: Duration,
}

/// In-memory cache of fuzzy hashes, indexed for candidate generation.
///
/// The primary map takes a record's identifier as its unique key; the
/// three inverted indices are owned exclusively by the cache and every
/// mutation goes through [`insert`](HashCache::insert), which keeps map
/// and indices consistent.
///
/// # Concurrency
///
/// Mutation takes `&mut self`, queries take `&self`, so the borrow checker
/// enforces the single-writer/concurrent-reader discipline within a
/// process. Callers sharing a cache across threads wrap it in an `RwLock`
/// (writers exclusive, readers shared); no operation here blocks on I/O.
#[derive(Debug, Default)]
pub struct HashCache {
    records: Vec<FuzzyHash>,
    slots: HashMap<String, Slot>,
    index: InvertedIndex,
}

impl HashCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `record` to the cache, or replace the record previously stored
    /// under the same identifier.
    ///
    /// On replacement the old record's index entries are removed before
    /// the new ones are added, so no stale bucket members survive an
    /// overwrite.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::EmptyIdentifier`] for records with an empty
    /// identifier: empty identifiers mark query-only records and are not
    /// valid cache keys.
    pub fn insert(&mut self, record: FuzzyHash) -> Result<(), CacheError> {
        if record.identifier().is_empty() {
            return Err(CacheError::EmptyIdentifier);
        }

        match self.slots.get(record.identifier()).copied() {
            Some(slot) => {
                log::debug!("Replacing cached record {}", record.identifier());
                let old = std::mem::replace(&mut self.records[slot], record);
                self.index.remove(slot, &old);
                self.index.insert(slot, &self.records[slot]);
            }
            None => {
                let slot = self.records.len();
                self.slots.insert(record.identifier().to_string(), slot);
                self.records.push(record);
                self.index.insert(slot, &self.records[slot]);
            }
        }
        Ok(())
    }

    /// Parse and insert a batch of `(identifier, raw_hash)` entries.
    ///
    /// Parsing fans out across threads; all index mutation happens on the
    /// calling thread. Under [`LoadPolicy::FailFast`] the whole batch is
    /// validated before anything is committed, so a failed load leaves the
    /// cache exactly as it was. Under [`LoadPolicy::SkipMalformed`] bad
    /// entries are logged at warn level and counted in
    /// [`LoadStats::skipped`].
    ///
    /// # Errors
    ///
    /// Returns the first [`CacheError`] under [`LoadPolicy::FailFast`].
    pub fn bulk_load<I>(&mut self, entries: I, policy: LoadPolicy) -> Result<LoadStats, CacheError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let start = Instant::now();
        let entries: Vec<(String, String)> = entries.into_iter().collect();
        log::info!("Loading {} fuzzy hashes into the cache", entries.len());

        let parsed: Vec<Result<FuzzyHash, MalformedHashError>> = entries
            .into_par_iter()
            .map(|(identifier, raw)| FuzzyHash::parse(identifier, &raw))
            .collect();

        if policy == LoadPolicy::FailFast {
            for result in &parsed {
                match result {
                    Err(err) => return Err(err.clone().into()),
                    Ok(record) if record.identifier().is_empty() => {
                        return Err(CacheError::EmptyIdentifier);
                    }
                    Ok(_) => {}
                }
            }
        }

        let mut stats = LoadStats::default();
        for result in parsed {
            match result
                .map_err(CacheError::from)
                .and_then(|record| self.insert(record))
            {
                Ok(()) => stats.loaded += 1,
                Err(err) => {
                    log::warn!("Skipping entry: {err}");
                    stats.skipped += 1;
                }
            }
        }

        stats.elapsed = start.elapsed();
        log::info!(
            "Cache initialized with {} records in {:.3}s ({} skipped)",
            self.len(),
            stats.elapsed.as_secs_f64(),
            stats.skipped
        );
        Ok(stats)
    }

    /// Look up a record by identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&FuzzyHash> {
        self.slots.get(identifier).map(|&slot| &self.records[slot])
    }

    /// Number of distinct identifiers currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the cache holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub(crate) fn record(&self, slot: Slot) -> &FuzzyHash {
        &self.records[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(id, raw)| (id.to_string(), raw.to_string()))
            .collect()
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = HashCache::new();
        cache
            .insert(FuzzyHash::parse("a", "96:ABCDEFG:abcdefg").unwrap())
            .unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").unwrap().chunk_size(), 96);
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_insert_rejects_empty_identifier() {
        let mut cache = HashCache::new();
        let err = cache
            .insert(FuzzyHash::parse("", "96:ABCDEFG:abcdefg").unwrap())
            .unwrap_err();

        assert_eq!(err, CacheError::EmptyIdentifier);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_replace_reindexes() {
        let mut cache = HashCache::new();
        cache
            .insert(FuzzyHash::parse("a", "96:ABCDEFG:abcdefg").unwrap())
            .unwrap();
        cache
            .insert(FuzzyHash::parse("a", "48:ZZZZZZZ:yyyyyyy").unwrap())
            .unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").unwrap().raw(), "48:ZZZZZZZ:yyyyyyy");
        // The replaced record's feature entries must be gone
        assert!(cache.index().chunk_size_bucket(96).is_none());
        assert!(cache.index().block1_gram_bucket("ABCDEFG").is_none());
        assert!(cache.index().chunk_size_bucket(48).is_some());
        assert!(cache.index().block1_gram_bucket("ZZZZZZZ").is_some());
    }

    #[test]
    fn test_bulk_load_ok() {
        let mut cache = HashCache::new();
        let stats = cache
            .bulk_load(
                entries(&[("a", "96:AAAAAAA:aaaaaaa"), ("b", "48:BBBBBBB:bbbbbbb")]),
                LoadPolicy::FailFast,
            )
            .unwrap();

        assert_eq!(stats.loaded, 2);
        assert_eq!(stats.skipped, 0);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_bulk_load_fail_fast_leaves_cache_untouched() {
        let mut cache = HashCache::new();
        let err = cache
            .bulk_load(
                entries(&[("a", "96:AAAAAAA:aaaaaaa"), ("x", "not-a-hash")]),
                LoadPolicy::FailFast,
            )
            .unwrap_err();

        assert!(matches!(err, CacheError::Malformed(_)));
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_bulk_load_fail_fast_rejects_empty_identifier() {
        let mut cache = HashCache::new();
        let err = cache
            .bulk_load(entries(&[("", "96:AAAAAAA:aaaaaaa")]), LoadPolicy::FailFast)
            .unwrap_err();

        assert_eq!(err, CacheError::EmptyIdentifier);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_bulk_load_skip_malformed() {
        let mut cache = HashCache::new();
        let stats = cache
            .bulk_load(
                entries(&[
                    ("a", "96:AAAAAAA:aaaaaaa"),
                    ("x", "not-a-hash"),
                    ("", "96:BBBBBBB:bbbbbbb"),
                    ("b", "48:CCCCCCC:ccccccc"),
                ]),
                LoadPolicy::SkipMalformed,
            )
            .unwrap();

        assert_eq!(stats.loaded, 2);
        assert_eq!(stats.skipped, 2);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_some());
    }
}
