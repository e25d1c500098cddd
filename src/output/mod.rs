//! Output formatters for query reports.
//!
//! This module provides the report data model shared by all formatters,
//! plus the formatters themselves:
//!
//! * [`json`]: machine-readable JSON for scripting
//! * [`csv`]: flat rows for spreadsheets
//! * [`write_text`]: human-readable text on stdout

pub mod csv;
pub mod json;

use std::io::Write;

use serde::Serialize;

use crate::matcher::Match;

/// Result of one query within a report.
#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    /// Identifier of the queried sample (may be empty for ad-hoc queries)
    pub identifier: String,
    /// The queried hash string
    pub hash: String,
    /// Similar cached records, highest score first
    pub matches: Vec<Match>,
    /// Failure for this entry, if any (lenient batch mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary statistics for a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportSummary {
    /// Number of records in the cache after the run
    pub cache_size: usize,
    /// Number of seed entries skipped during the load
    pub seed_skipped: usize,
    /// Number of queries executed
    pub queries: usize,
    /// Number of queries with at least one match
    pub queries_with_matches: usize,
    /// Number of queries that failed (lenient batch mode)
    pub failed_queries: usize,
    /// Total number of reported matches
    pub total_matches: usize,
    /// Duration of the seed load in milliseconds
    pub load_duration_ms: u64,
    /// Duration of all queries in milliseconds
    pub query_duration_ms: u64,
}

/// Write a human-readable report.
///
/// # Errors
///
/// Returns any I/O error from the underlying writer.
pub fn write_text<W: Write>(
    mut writer: W,
    reports: &[QueryReport],
    summary: &ReportSummary,
) -> std::io::Result<()> {
    for report in reports {
        let label = if report.identifier.is_empty() {
            report.hash.as_str()
        } else {
            report.identifier.as_str()
        };
        if let Some(error) = &report.error {
            writeln!(writer, "{label}: FAILED ({error})")?;
            continue;
        }
        if report.matches.is_empty() {
            writeln!(writer, "{label}: no similar records")?;
            continue;
        }
        writeln!(writer, "{label}:")?;
        for m in &report.matches {
            writeln!(writer, "  {:>3}  {}", m.score, m.identifier)?;
        }
    }
    writeln!(
        writer,
        "{} queries, {} with matches, {} matches total ({} cached records)",
        summary.queries, summary.queries_with_matches, summary.total_matches, summary.cache_size
    )?;
    Ok(())
}
