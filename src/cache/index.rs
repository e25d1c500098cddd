//! Inverted indices over cached fuzzy hashes.
//!
//! Three independent maps keyed by derived features:
//! - chunk size
//! - 7-grams of block1
//! - 7-grams of block2
//!
//! Bucket values are slots into the cache's record table — membership, not
//! ownership. A record present in the cache appears in the chunk-size
//! bucket for its own chunk size and in a gram bucket for every contiguous
//! 7-character substring of the corresponding block; a block shorter than
//! 7 characters contributes no gram entries.

use std::collections::{HashMap, HashSet};

use crate::hash::FuzzyHash;

/// Handle to a record in the cache's slot table.
pub type Slot = usize;

/// The three feature indices consulted during candidate generation.
///
/// Owned exclusively by [`HashCache`](crate::cache::HashCache), which keeps
/// them synchronized with the primary map on every insertion.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    by_chunk_size: HashMap<u64, HashSet<Slot>>,
    by_block1_gram: HashMap<String, HashSet<Slot>>,
    by_block2_gram: HashMap<String, HashSet<Slot>>,
}

impl InvertedIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `record` under its chunk size and under every 7-gram of both
    /// blocks. Purely additive.
    pub fn insert(&mut self, slot: Slot, record: &FuzzyHash) {
        self.by_chunk_size
            .entry(record.chunk_size())
            .or_default()
            .insert(slot);
        for gram in record.block1_grams() {
            self.by_block1_gram
                .entry(gram.to_string())
                .or_default()
                .insert(slot);
        }
        for gram in record.block2_grams() {
            self.by_block2_gram
                .entry(gram.to_string())
                .or_default()
                .insert(slot);
        }
    }

    /// Remove the entries `insert` created for `record` under `slot`.
    ///
    /// `record` must be the exact record that was indexed; buckets that
    /// become empty are dropped.
    pub fn remove(&mut self, slot: Slot, record: &FuzzyHash) {
        if let Some(bucket) = self.by_chunk_size.get_mut(&record.chunk_size()) {
            bucket.remove(&slot);
            if bucket.is_empty() {
                self.by_chunk_size.remove(&record.chunk_size());
            }
        }
        for gram in record.block1_grams() {
            if let Some(bucket) = self.by_block1_gram.get_mut(gram) {
                bucket.remove(&slot);
                if bucket.is_empty() {
                    self.by_block1_gram.remove(gram);
                }
            }
        }
        for gram in record.block2_grams() {
            if let Some(bucket) = self.by_block2_gram.get_mut(gram) {
                bucket.remove(&slot);
                if bucket.is_empty() {
                    self.by_block2_gram.remove(gram);
                }
            }
        }
    }

    /// Records indexed under exactly chunk size `n`.
    ///
    /// `None` is an empty bucket, never an error.
    #[must_use]
    pub fn chunk_size_bucket(&self, n: u64) -> Option<&HashSet<Slot>> {
        self.by_chunk_size.get(&n)
    }

    /// Records whose block1 contains `gram`.
    #[must_use]
    pub fn block1_gram_bucket(&self, gram: &str) -> Option<&HashSet<Slot>> {
        self.by_block1_gram.get(gram)
    }

    /// Records whose block2 contains `gram`.
    #[must_use]
    pub fn block2_gram_bucket(&self, gram: &str) -> Option<&HashSet<Slot>> {
        self.by_block2_gram.get(gram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(identifier: &str, raw: &str) -> FuzzyHash {
        FuzzyHash::parse(identifier, raw).unwrap()
    }

    #[test]
    fn test_insert_populates_all_three_indices() {
        let mut index = InvertedIndex::new();
        let r = record("a", "96:ABCDEFGH:abcdefgh");
        index.insert(0, &r);

        assert!(index.chunk_size_bucket(96).unwrap().contains(&0));
        assert!(index.block1_gram_bucket("ABCDEFG").unwrap().contains(&0));
        assert!(index.block1_gram_bucket("BCDEFGH").unwrap().contains(&0));
        assert!(index.block2_gram_bucket("abcdefg").unwrap().contains(&0));
        assert!(index.chunk_size_bucket(48).is_none());
        assert!(index.block1_gram_bucket("abcdefg").is_none());
    }

    #[test]
    fn test_short_blocks_contribute_no_grams() {
        let mut index = InvertedIndex::new();
        index.insert(0, &record("a", "96:short:tiny"));

        assert!(index.chunk_size_bucket(96).is_some());
        assert!(index.block1_gram_bucket("short").is_none());
        assert!(index.block2_gram_bucket("tiny").is_none());
    }

    #[test]
    fn test_shared_gram_bucket() {
        let mut index = InvertedIndex::new();
        index.insert(0, &record("a", "96:XXABCDEFG:aa"));
        index.insert(1, &record("b", "192:ABCDEFGYY:bb"));

        let bucket = index.block1_gram_bucket("ABCDEFG").unwrap();
        assert_eq!(bucket.len(), 2);
        assert!(bucket.contains(&0) && bucket.contains(&1));
    }

    #[test]
    fn test_remove_prunes_empty_buckets() {
        let mut index = InvertedIndex::new();
        let r = record("a", "96:ABCDEFGH:abcdefgh");
        index.insert(0, &r);
        index.remove(0, &r);

        assert!(index.chunk_size_bucket(96).is_none());
        assert!(index.block1_gram_bucket("ABCDEFG").is_none());
        assert!(index.block2_gram_bucket("abcdefg").is_none());
    }

    #[test]
    fn test_remove_keeps_other_members() {
        let mut index = InvertedIndex::new();
        let a = record("a", "96:ABCDEFG:abcdefg");
        let b = record("b", "96:ABCDEFG:abcdefg");
        index.insert(0, &a);
        index.insert(1, &b);
        index.remove(0, &a);

        let bucket = index.chunk_size_bucket(96).unwrap();
        assert_eq!(bucket.len(), 1);
        assert!(bucket.contains(&1));
        assert!(index.block1_gram_bucket("ABCDEFG").unwrap().contains(&1));
    }
}
