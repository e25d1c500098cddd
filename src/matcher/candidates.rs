//! Candidate generation over the cache's inverted indices.
//!
//! Pairwise fuzzy-hash scoring only produces a non-zero result when the
//! two hashes were generated at chunk sizes that are equal, double, or
//! half of one another, and sharing a 7-character substring in either
//! block is a necessary precondition for non-trivial similarity. Both
//! filters are cheap bucket lookups, so the expensive scorer only ever
//! runs against their intersection.

use std::collections::HashSet;

use crate::cache::index::Slot;
use crate::cache::HashCache;
use crate::hash::FuzzyHash;

/// Slots of records that are plausible by length and by shared substring.
pub(crate) fn candidate_slots(query: &FuzzyHash, cache: &HashCache) -> HashSet<Slot> {
    let index = cache.index();
    let n = query.chunk_size();

    let mut same_length: HashSet<Slot> = HashSet::new();
    if let Some(bucket) = index.chunk_size_bucket(n) {
        same_length.extend(bucket);
    }
    // A doubled chunk size that overflows u64 has no bucket
    if let Some(double) = n.checked_mul(2) {
        if let Some(bucket) = index.chunk_size_bucket(double) {
            same_length.extend(bucket);
        }
    }
    // An odd chunk size has no half-granularity peer
    if n % 2 == 0 {
        if let Some(bucket) = index.chunk_size_bucket(n / 2) {
            same_length.extend(bucket);
        }
    }

    if same_length.is_empty() {
        log::debug!("No length-compatible records for chunk size {n}");
        return HashSet::new();
    }

    let mut shared_substring: HashSet<Slot> = HashSet::new();
    for gram in query.block1_grams() {
        if let Some(bucket) = index.block1_gram_bucket(gram) {
            shared_substring.extend(bucket);
        }
    }
    for gram in query.block2_grams() {
        if let Some(bucket) = index.block2_gram_bucket(gram) {
            shared_substring.extend(bucket);
        }
    }

    let candidates: HashSet<Slot> = same_length.intersection(&shared_substring).copied().collect();
    log::debug!(
        "Generated {} candidates ({} pruned)",
        candidates.len(),
        cache.len() - candidates.len()
    );
    candidates
}

/// Cached records worth running the expensive pairwise scorer against.
///
/// The result is the intersection of "plausible by length" (chunk size
/// equal, double, or — for even query sizes — half) and "plausible by
/// shared substring" (at least one common 7-gram in the corresponding
/// block). It may legitimately be empty, and the order is unspecified.
#[must_use]
pub fn candidates<'a>(query: &FuzzyHash, cache: &'a HashCache) -> Vec<&'a FuzzyHash> {
    candidate_slots(query, cache)
        .into_iter()
        .map(|slot| cache.record(slot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LoadPolicy;

    fn cache_of(pairs: &[(&str, &str)]) -> HashCache {
        let mut cache = HashCache::new();
        cache
            .bulk_load(
                pairs
                    .iter()
                    .map(|(id, raw)| (id.to_string(), raw.to_string())),
                LoadPolicy::FailFast,
            )
            .unwrap();
        cache
    }

    fn ids(query: &FuzzyHash, cache: &HashCache) -> Vec<String> {
        let mut ids: Vec<String> = candidates(query, cache)
            .into_iter()
            .map(|r| r.identifier().to_string())
            .collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_length_filter_draws_from_same_double_and_half() {
        let cache = cache_of(&[
            ("s64", "64:ABCDEFGHIJ:abcdefghij"),
            ("s128", "128:ABCDEFGHIJ:abcdefghij"),
            ("s256", "256:ABCDEFGHIJ:abcdefghij"),
            ("s512", "512:ABCDEFGHIJ:abcdefghij"),
        ]);
        let query = FuzzyHash::parse("q", "128:ABCDEFGHIJ:abcdefghij").unwrap();

        assert_eq!(ids(&query, &cache), vec!["s128", "s256", "s64"]);
    }

    #[test]
    fn test_odd_chunk_size_skips_half_bucket() {
        let cache = cache_of(&[
            ("s48", "48:ABCDEFGHIJ:abcdefghij"),
            ("s97", "97:ABCDEFGHIJ:abcdefghij"),
            ("s194", "194:ABCDEFGHIJ:abcdefghij"),
        ]);
        let query = FuzzyHash::parse("q", "97:ABCDEFGHIJ:abcdefghij").unwrap();

        // No rounding: floor(97 / 2) = 48 must not be considered
        assert_eq!(ids(&query, &cache), vec!["s194", "s97"]);
    }

    #[test]
    fn test_substring_filter_requires_a_shared_gram() {
        let cache = cache_of(&[
            ("shared", "96:XXABCDEFGXX:uuuuuuu"),
            ("disjoint", "96:NOPQRSTUVWX:zzzzzzz"),
        ]);
        let query = FuzzyHash::parse("q", "96:ABCDEFG:vvvvvvv").unwrap();

        assert_eq!(ids(&query, &cache), vec!["shared"]);
    }

    #[test]
    fn test_short_blocks_may_yield_nothing() {
        let cache = cache_of(&[("a", "96:ABCDEFGHIJ:abcdefghij")]);
        // Both blocks under 7 chars contribute no grams at all
        let query = FuzzyHash::parse("q", "96:ABC:abc").unwrap();

        assert!(candidates(&query, &cache).is_empty());
    }

    #[test]
    fn test_one_block_can_carry_the_match() {
        let cache = cache_of(&[("a", "96:ABCDEFGHIJ:abcdefghij")]);
        // block1 too short to gram, block2 shares a gram
        let query = FuzzyHash::parse("q", "96:ABC:abcdefg").unwrap();

        assert_eq!(ids(&query, &cache), vec!["a"]);
    }

    #[test]
    fn test_empty_cache_yields_no_candidates() {
        let cache = HashCache::new();
        let query = FuzzyHash::parse("q", "96:ABCDEFGHIJ:abcdefghij").unwrap();

        assert!(candidates(&query, &cache).is_empty());
    }
}
