//! Fuzzy hash parsing and feature extraction.
//!
//! This module provides functionality for:
//! - Parsing ssdeep-style hash strings of the form `chunk_size:block1:block2`
//! - Extracting the 7-gram substring features used by the inverted indices
//!
//! A [`FuzzyHash`] is immutable after construction: a string either parses
//! into a complete record or the parse fails with [`MalformedHashError`].
//! No partially parsed record ever exists.

pub mod ngram;

pub use ngram::{ngrams, Ngrams};

use thiserror::Error;

/// Length of the substring features extracted from each block.
///
/// Sharing at least one contiguous substring of this length is a necessary
/// (not sufficient) precondition for a non-trivial similarity score, which
/// makes the gram buckets a cheap high-recall filter.
pub const GRAM_LEN: usize = 7;

/// Errors that can occur while parsing a fuzzy hash string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedHashError {
    /// The hash string did not contain exactly two colon separators.
    #[error("expected `chunk_size:block1:block2`, found {found} field(s) in {hash:?}")]
    FieldCount {
        /// The offending hash string
        hash: String,
        /// Number of colon-separated fields that were found
        found: usize,
    },

    /// The first field did not parse as a positive integer.
    #[error("chunk size {field:?} in {hash:?} is not a positive integer")]
    ChunkSize {
        /// The offending hash string
        hash: String,
        /// The first field as received
        field: String,
    },
}

/// A parsed fuzzy hash together with the identifier of the sample it
/// belongs to.
///
/// `block1` digests the content at `chunk_size` granularity, `block2` at
/// double that granularity. Two records refer to the same cached sample
/// exactly when their identifiers are equal (see [`FuzzyHash::same_record`]);
/// the derived `PartialEq` remains field-wise value equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyHash {
    identifier: String,
    raw: String,
    chunk_size: u64,
    block1: String,
    block2: String,
}

impl FuzzyHash {
    /// Parse a raw hash string into a record owned by `identifier`.
    ///
    /// The identifier may be empty for ad-hoc queries; caching such a
    /// record is rejected by the cache, not here.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedHashError`] if `raw` does not split into exactly
    /// three colon-separated fields or the first field is not a positive
    /// integer.
    pub fn parse(identifier: impl Into<String>, raw: &str) -> Result<Self, MalformedHashError> {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() != 3 {
            return Err(MalformedHashError::FieldCount {
                hash: raw.to_string(),
                found: parts.len(),
            });
        }

        let chunk_size = parts[0]
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| MalformedHashError::ChunkSize {
                hash: raw.to_string(),
                field: parts[0].to_string(),
            })?;

        Ok(Self {
            identifier: identifier.into(),
            raw: raw.to_string(),
            chunk_size,
            block1: parts[1].to_string(),
            block2: parts[2].to_string(),
        })
    }

    /// Caller-supplied identifier of the hashed sample.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The full hash string as received.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Block-splitting granularity of `block1`.
    #[must_use]
    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Digest at `chunk_size` granularity.
    #[must_use]
    pub fn block1(&self) -> &str {
        &self.block1
    }

    /// Digest at `2 * chunk_size` granularity.
    #[must_use]
    pub fn block2(&self) -> &str {
        &self.block2
    }

    /// Every contiguous 7-character substring of `block1`.
    ///
    /// Empty for blocks shorter than 7 characters.
    pub fn block1_grams(&self) -> Ngrams<'_> {
        ngrams(&self.block1, GRAM_LEN)
    }

    /// Every contiguous 7-character substring of `block2`.
    pub fn block2_grams(&self) -> Ngrams<'_> {
        ngrams(&self.block2, GRAM_LEN)
    }

    /// Whether `self` and `other` refer to the same cached sample.
    ///
    /// Identity is identifier equality, not hash equality: two distinct
    /// identifiers with identical hash strings are different records.
    #[must_use]
    pub fn same_record(&self, other: &FuzzyHash) -> bool {
        self.identifier == other.identifier
    }
}
