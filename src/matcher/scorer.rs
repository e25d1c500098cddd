//! Default edit-distance similarity scorer.
//!
//! The matching engine treats the scoring primitive as opaque; this is the
//! batteries-included implementation the CLI uses, a stand-in for a full
//! ssdeep comparator. It scores the comparable block pair with normalized
//! Levenshtein similarity.

use strsim::normalized_levenshtein;

use crate::hash::FuzzyHash;
use crate::matcher::engine::SimilarityScorer;

/// Edit-distance scorer over the comparable block pair.
///
/// Fuzzy hashes are only comparable when their chunk sizes are equal,
/// double, or half of one another; every other pairing scores 0, as does
/// any input that is not a well-formed hash string. For equal chunk sizes
/// both block pairs are compared and the better score wins; across a
/// factor-of-two size difference, the finer hash's block2 lines up with
/// the coarser hash's block1.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockScorer;

impl BlockScorer {
    fn block_score(a: &str, b: &str) -> u8 {
        // Two empty blocks carry no signal
        if a.is_empty() && b.is_empty() {
            return 0;
        }
        (normalized_levenshtein(a, b) * 100.0).round() as u8
    }
}

impl SimilarityScorer for BlockScorer {
    fn score(&self, a: &str, b: &str) -> u8 {
        let (Ok(a), Ok(b)) = (FuzzyHash::parse("", a), FuzzyHash::parse("", b)) else {
            return 0;
        };

        if a.chunk_size() == b.chunk_size() {
            Self::block_score(a.block1(), b.block1()).max(Self::block_score(a.block2(), b.block2()))
        } else if a.chunk_size().checked_mul(2) == Some(b.chunk_size()) {
            Self::block_score(a.block2(), b.block1())
        } else if b.chunk_size().checked_mul(2) == Some(a.chunk_size()) {
            Self::block_score(a.block1(), b.block2())
        } else {
            0
        }
    }
}
