//! Query orchestration over an external similarity scorer.

use serde::Serialize;

use crate::cache::{CacheError, HashCache};
use crate::hash::{FuzzyHash, MalformedHashError};
use crate::matcher::candidates::candidate_slots;

/// The external pairwise scoring primitive.
///
/// Takes two raw fuzzy hash strings and returns a similarity score in
/// `0..=100`. The primitive is expected to be deterministic for identical
/// inputs and to return 0 — not an error — for pairs with no comparable
/// overlap, including incompatible chunk sizes. Scores above 100 are
/// clamped by the engine.
pub trait SimilarityScorer {
    /// Score the similarity of two raw hash strings.
    fn score(&self, a: &str, b: &str) -> u8;
}

impl<F> SimilarityScorer for F
where
    F: Fn(&str, &str) -> u8,
{
    fn score(&self, a: &str, b: &str) -> u8 {
        self(a, b)
    }
}

/// A single similarity hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Identifier of the similar cached record
    pub identifier: String,
    /// Similarity score in `1..=100`
    pub score: u8,
}

/// Runs similarity queries against a [`HashCache`].
///
/// For each query the matcher generates the candidate set, scores every
/// candidate with the supplied [`SimilarityScorer`], and reports the
/// candidates with a score above zero — excluding the query's own
/// identifier. The returned matches are unordered; callers wanting ranked
/// output sort explicitly.
pub struct Matcher<S> {
    scorer: S,
}

impl<S: SimilarityScorer> Matcher<S> {
    /// Create a matcher around a scoring primitive.
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    /// Find cached records similar to `raw`.
    ///
    /// Read-only: the query record is parsed, scored, and discarded.
    /// `identifier` may be empty for ad-hoc lookups; it only participates
    /// in self-exclusion.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedHashError`] if `raw` does not parse.
    pub fn query(
        &self,
        cache: &HashCache,
        identifier: &str,
        raw: &str,
    ) -> Result<Vec<Match>, MalformedHashError> {
        let query = FuzzyHash::parse(identifier, raw)?;
        Ok(self.score_candidates(cache, &query))
    }

    /// Like [`query`](Matcher::query), then insert the query record into
    /// the cache.
    ///
    /// Insertion happens strictly after scoring, so a query never sees
    /// itself as a candidate. Whether to cache a query is the caller's
    /// decision, made by choosing this method over `query`; a non-empty
    /// identifier is required.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::EmptyIdentifier`] before any scoring work if
    /// `identifier` is empty, or [`CacheError::Malformed`] if `raw` does
    /// not parse.
    pub fn query_and_insert(
        &self,
        cache: &mut HashCache,
        identifier: &str,
        raw: &str,
    ) -> Result<Vec<Match>, CacheError> {
        if identifier.is_empty() {
            return Err(CacheError::EmptyIdentifier);
        }
        let query = FuzzyHash::parse(identifier, raw)?;
        let matches = self.score_candidates(cache, &query);
        cache.insert(query)?;
        Ok(matches)
    }

    fn score_candidates(&self, cache: &HashCache, query: &FuzzyHash) -> Vec<Match> {
        let mut matches = Vec::new();
        for slot in candidate_slots(query, cache) {
            let candidate = cache.record(slot);
            // Self-exclusion is by identifier: the same hash under another
            // identifier is still reportable
            if candidate.same_record(query) {
                continue;
            }
            let score = self.scorer.score(query.raw(), candidate.raw()).min(100);
            log::trace!(
                "{} vs {}: score {}",
                query.identifier(),
                candidate.identifier(),
                score
            );
            if score > 0 {
                matches.push(Match {
                    identifier: candidate.identifier().to_string(),
                    score,
                });
            }
        }
        matches
    }
}
