//! CSV output formatter for query reports.
//!
//! One row per (query, match) pair, so results pivot cleanly in a
//! spreadsheet. Queries without matches contribute no rows; the summary
//! lives in the JSON and text formats only.

use std::io::Write;

use crate::output::QueryReport;

/// Write reports as `query,hash,match,score` rows.
///
/// # Errors
///
/// Returns a `csv::Error` on serialization or I/O failure.
pub fn write_csv<W: Write>(writer: W, reports: &[QueryReport]) -> csv::Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["query", "hash", "match", "score"])?;
    for report in reports {
        for m in &report.matches {
            w.write_record([
                report.identifier.as_str(),
                report.hash.as_str(),
                m.identifier.as_str(),
                &m.score.to_string(),
            ])?;
        }
    }
    w.flush()?;
    Ok(())
}
