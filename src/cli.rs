//! Command-line interface definitions for simsieve.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, error format) and
//! subcommands for different operations.
//!
//! # Example
//!
//! ```bash
//! # Query one hash against a seeded cache
//! simsieve query --seed corpus.json "96:ABCDEFGHIJ:abcdefghij"
//!
//! # Query an ssdeep listing entry by entry, cross-matching as it goes
//! simsieve batch samples.csv --seed corpus.csv --add --output json
//!
//! # Verbose mode for debugging
//! simsieve -v query --seed corpus.json "96:ABCDEFGHIJ:abcdefghij"
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Fuzzy-hash similarity lookups against a seeded cache.
///
/// simsieve answers "which previously seen samples are similar to this
/// one?" over ssdeep-style hashes. Instead of scoring a query against
/// every cached record, inverted indices narrow it to a small candidate
/// set first.
#[derive(Debug, Parser)]
#[command(name = "simsieve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report errors as structured JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for simsieve.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Query a single fuzzy hash against the cache
    Query(QueryArgs),
    /// Query every entry of a hash listing
    Batch(BatchArgs),
}

/// Arguments for the query subcommand.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// The fuzzy hash to look up (`chunk_size:block1:block2`)
    #[arg(value_name = "HASH")]
    pub hash: String,

    /// Identifier of the queried sample
    ///
    /// Only used for self-exclusion and caching; required with --add.
    #[arg(long, value_name = "ID", default_value = "")]
    pub id: String,

    /// Seed file (JSON map or ssdeep CSV listing) loaded before the query
    #[arg(long, value_name = "FILE", env = "SIMSIEVE_SEED")]
    pub seed: Option<PathBuf>,

    /// Add the queried hash to the cache after scoring
    ///
    /// Requires a non-empty --id.
    #[arg(long)]
    pub add: bool,

    /// Lowest similarity score to report
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub min_score: Option<u8>,

    /// Skip malformed seed entries instead of aborting the load
    #[arg(long)]
    pub skip_malformed: bool,

    /// Output format (text for humans, json/csv for scripting)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the batch subcommand.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Hash listing to query (JSON map or ssdeep CSV listing)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Seed file loaded into the cache before the batch runs
    #[arg(long, value_name = "FILE", env = "SIMSIEVE_SEED")]
    pub seed: Option<PathBuf>,

    /// Insert each entry after it is scored
    ///
    /// Later entries then match earlier ones, so a whole corpus can be
    /// cross-matched in one pass over its own listing.
    #[arg(long)]
    pub add: bool,

    /// Lowest similarity score to report
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub min_score: Option<u8>,

    /// Skip malformed entries (seed and batch) instead of aborting
    #[arg(long)]
    pub skip_malformed: bool,

    /// Output format (text for humans, json/csv for scripting)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format for query reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
