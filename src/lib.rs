//! simsieve - Fuzzy-Hash Similarity Cache
//!
//! Answers "which previously seen samples are similar to this one?" over
//! ssdeep-style context-triggered piecewise hashes. Instead of scoring a
//! query against every cached record, three inverted indices (chunk size,
//! block1 7-grams, block2 7-grams) narrow the search to a small candidate
//! set before the expensive pairwise scorer runs.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod hash;
pub mod loader;
pub mod logging;
pub mod matcher;
pub mod output;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::cache::{CacheError, HashCache, LoadPolicy, LoadStats};
use crate::cli::{BatchArgs, Cli, Commands, OutputFormat, QueryArgs};
use crate::config::Config;
use crate::error::ExitCode;
use crate::matcher::{BlockScorer, Match, Matcher};
use crate::output::{json::JsonReport, QueryReport, ReportSummary};

/// Run the application logic for the parsed CLI arguments.
///
/// # Errors
///
/// Returns an error for failures the subcommand cannot report as a
/// partial result: unreadable input files, aborted seed loads, malformed
/// queries under fail-fast policy.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    let config = Config::load();

    match cli.command {
        Commands::Query(args) => run_query(args, &config),
        Commands::Batch(args) => run_batch(args, &config),
    }
}

fn load_cache(seed: Option<&Path>, policy: LoadPolicy) -> Result<(HashCache, LoadStats)> {
    let mut cache = HashCache::new();
    let mut stats = LoadStats::default();
    if let Some(path) = seed {
        let entries = loader::load_entries(path)
            .with_context(|| format!("Failed to read seed {}", path.display()))?;
        stats = cache
            .bulk_load(entries, policy)
            .context("Failed to load seed entries")?;
    }
    Ok((cache, stats))
}

fn policy_for(skip_malformed: bool, config: &Config) -> LoadPolicy {
    if skip_malformed {
        LoadPolicy::SkipMalformed
    } else {
        config.load_policy
    }
}

/// Sort matches for presentation and drop those under the score floor.
///
/// The matcher's contract leaves ordering unspecified; ranking is this
/// caller's choice.
fn rank_matches(mut matches: Vec<Match>, min_score: u8) -> Vec<Match> {
    matches.retain(|m| m.score >= min_score);
    matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.identifier.cmp(&b.identifier)));
    matches
}

fn run_query(args: QueryArgs, config: &Config) -> Result<ExitCode> {
    if args.add && args.id.is_empty() {
        anyhow::bail!("--add requires a non-empty --id");
    }

    let policy = policy_for(args.skip_malformed, config);
    let seed = args.seed.clone().or_else(|| config.seed.clone());
    let (mut cache, load_stats) = load_cache(seed.as_deref(), policy)?;
    let min_score = args.min_score.unwrap_or(config.min_score).max(1);

    let matcher = Matcher::new(BlockScorer);
    let start = Instant::now();
    let matches = if args.add {
        matcher.query_and_insert(&mut cache, &args.id, &args.hash)?
    } else {
        matcher
            .query(&cache, &args.id, &args.hash)
            .map_err(CacheError::from)?
    };
    let query_duration = start.elapsed();

    let report = QueryReport {
        identifier: args.id,
        hash: args.hash,
        matches: rank_matches(matches, min_score),
        error: None,
    };
    let summary = ReportSummary {
        cache_size: cache.len(),
        seed_skipped: load_stats.skipped,
        queries: 1,
        queries_with_matches: usize::from(!report.matches.is_empty()),
        failed_queries: 0,
        total_matches: report.matches.len(),
        load_duration_ms: load_stats.elapsed.as_millis() as u64,
        query_duration_ms: query_duration.as_millis() as u64,
    };

    let exit_code = exit_code_for(&summary);
    emit(&[report], &summary, args.output, exit_code)?;
    Ok(exit_code)
}

fn run_batch(args: BatchArgs, config: &Config) -> Result<ExitCode> {
    let policy = policy_for(args.skip_malformed, config);
    let entries = loader::load_entries(&args.file)
        .with_context(|| format!("Failed to read batch {}", args.file.display()))?;
    let seed = args.seed.clone().or_else(|| config.seed.clone());
    let (mut cache, load_stats) = load_cache(seed.as_deref(), policy)?;
    let min_score = args.min_score.unwrap_or(config.min_score).max(1);

    let matcher = Matcher::new(BlockScorer);
    let start = Instant::now();
    let mut reports = Vec::with_capacity(entries.len());
    for (identifier, hash) in entries {
        let result = if args.add {
            matcher.query_and_insert(&mut cache, &identifier, &hash)
        } else {
            matcher
                .query(&cache, &identifier, &hash)
                .map_err(CacheError::from)
        };
        match result {
            Ok(matches) => reports.push(QueryReport {
                identifier,
                hash,
                matches: rank_matches(matches, min_score),
                error: None,
            }),
            Err(err) if policy == LoadPolicy::SkipMalformed => {
                log::warn!("Query for {identifier:?} failed: {err}");
                reports.push(QueryReport {
                    identifier,
                    hash,
                    matches: Vec::new(),
                    error: Some(err.to_string()),
                });
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Query for {identifier:?} failed"));
            }
        }
    }
    let query_duration = start.elapsed();

    let summary = ReportSummary {
        cache_size: cache.len(),
        seed_skipped: load_stats.skipped,
        queries: reports.len(),
        queries_with_matches: reports.iter().filter(|r| !r.matches.is_empty()).count(),
        failed_queries: reports.iter().filter(|r| r.error.is_some()).count(),
        total_matches: reports.iter().map(|r| r.matches.len()).sum(),
        load_duration_ms: load_stats.elapsed.as_millis() as u64,
        query_duration_ms: query_duration.as_millis() as u64,
    };

    let exit_code = exit_code_for(&summary);
    emit(&reports, &summary, args.output, exit_code)?;
    Ok(exit_code)
}

fn exit_code_for(summary: &ReportSummary) -> ExitCode {
    if summary.failed_queries > 0 || summary.seed_skipped > 0 {
        ExitCode::PartialSuccess
    } else if summary.total_matches > 0 {
        ExitCode::Success
    } else {
        ExitCode::NoMatches
    }
}

fn emit(
    reports: &[QueryReport],
    summary: &ReportSummary,
    format: OutputFormat,
    exit_code: ExitCode,
) -> Result<()> {
    let stdout = std::io::stdout();
    match format {
        OutputFormat::Text => output::write_text(stdout.lock(), reports, summary)?,
        OutputFormat::Json => {
            let report = JsonReport::new(reports, summary, exit_code);
            println!("{}", report.to_json_pretty()?);
        }
        OutputFormat::Csv => output::csv::write_csv(stdout.lock(), reports)?,
    }
    Ok(())
}
