//! JSON output formatter for query reports.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "generated_at": "2026-08-06T12:00:00Z",
//!   "queries": [
//!     {
//!       "identifier": "sample-2",
//!       "hash": "96:ABCDEFGHIJ:abcdefghij",
//!       "matches": [
//!         { "identifier": "sample-1", "score": 90 }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "cache_size": 100,
//!     "queries": 1,
//!     "queries_with_matches": 1,
//!     "total_matches": 1,
//!     "exit_code": 0,
//!     "exit_code_name": "SV000"
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ExitCode;
use crate::output::{QueryReport, ReportSummary};

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// The run summary
    #[serde(flatten)]
    pub summary: ReportSummary,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "SV000")
    pub exit_code_name: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Per-query results
    pub queries: &'a [QueryReport],
    /// Run summary statistics
    pub summary: JsonSummary,
}

impl<'a> JsonReport<'a> {
    /// Create a new JSON report from query results, summary and exit code.
    #[must_use]
    pub fn new(queries: &'a [QueryReport], summary: &ReportSummary, exit_code: ExitCode) -> Self {
        Self {
            generated_at: Utc::now(),
            queries,
            summary: JsonSummary {
                summary: summary.clone(),
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Serialize to a compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to a pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
