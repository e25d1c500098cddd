//! Fuzzy-hash cache module.
//!
//! This module provides in-memory storage for parsed fuzzy hashes, indexed
//! so that a query never has to be scored against every cached record.
//!
//! # Architecture
//!
//! The cache is split into two components:
//!
//! * [`store`]: The authoritative identifier → record map and the bulk-load
//!   path. Every mutation goes through a single insertion operation.
//! * [`index`]: The three inverted indices (chunk size, block1 7-grams,
//!   block2 7-grams) the store keeps synchronized on every insertion.
//!
//! # Consistency
//!
//! A record stored in the cache is always reachable through all three
//! indices, and only through features of its current hash: replacing a
//! record under an existing identifier removes the old record's index
//! entries before adding the new ones.

pub mod index;
pub mod store;

pub use index::InvertedIndex;
pub use store::{HashCache, LoadPolicy, LoadStats};

use thiserror::Error;

use crate::hash::MalformedHashError;

/// Errors that can occur while mutating the cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A hash string failed to parse.
    #[error(transparent)]
    Malformed(#[from] MalformedHashError),

    /// The record carries an empty identifier.
    ///
    /// Empty identifiers mark query-only records; caching one would make
    /// it indistinguishable from the "do not cache" sentinel.
    #[error("cannot cache a record with an empty identifier")]
    EmptyIdentifier,
}
