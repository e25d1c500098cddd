//! Similarity matching module.
//!
//! This module provides functionality for:
//! - Candidate generation over the cache's inverted indices
//! - Query orchestration against an external scoring primitive
//! - A default edit-distance scorer for standalone use

pub mod candidates;
pub mod engine;
pub mod scorer;

pub use candidates::candidates;
pub use engine::{Match, Matcher, SimilarityScorer};
pub use scorer::BlockScorer;
