//! Seed and batch input loading.
//!
//! Two on-disk formats are accepted, dispatched on file extension:
//!
//! - `.json`: an object mapping identifier → hash string
//! - `.csv`: the native ssdeep listing format, with its
//!   `ssdeep,1.1--blocksize:hash:hash,filename` header and
//!   `hash,"filename"` rows; the filename becomes the identifier
//!
//! Loading is input plumbing only: rows are read leniently (short rows
//! are skipped with a warning), and hash validation happens later at
//! bulk-load time under the configured [`LoadPolicy`](crate::cache::LoadPolicy).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading a seed or batch file.
#[derive(Debug, Error)]
pub enum SeedError {
    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The JSON file did not contain a string-to-string object.
    #[error("Failed to parse JSON seed {path}: {source}")]
    Json {
        /// Path to the JSON file
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// A CSV row could not be read.
    #[error("Failed to parse CSV seed {path}: {source}")]
    Csv {
        /// Path to the CSV file
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: csv::Error,
    },

    /// The file extension maps to no known format.
    #[error("Unsupported seed format: {0:?} (expected .json or .csv)")]
    UnsupportedFormat(String),
}

/// Load `(identifier, hash)` pairs from a seed or batch file.
///
/// # Errors
///
/// Returns [`SeedError`] if the file cannot be read or parsed, or if its
/// extension maps to no known format.
pub fn load_entries(path: &Path) -> Result<Vec<(String, String)>, SeedError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        _ => Err(SeedError::UnsupportedFormat(extension)),
    }
}

fn load_json(path: &Path) -> Result<Vec<(String, String)>, SeedError> {
    let content = fs::read_to_string(path).map_err(|e| SeedError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let map: BTreeMap<String, String> =
        serde_json::from_str(&content).map_err(|e| SeedError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(map.into_iter().collect())
}

fn load_csv(path: &Path) -> Result<Vec<(String, String)>, SeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SeedError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

    let headers = reader.headers().map_err(|e| SeedError::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;
    if headers.get(0) != Some("ssdeep") {
        log::warn!(
            "{} does not carry an ssdeep header; reading rows as hash,identifier anyway",
            path.display()
        );
    }

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SeedError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        let (Some(hash), Some(identifier)) = (record.get(0), record.get(1)) else {
            log::warn!(
                "Skipping CSV row {:?} without hash and identifier",
                record.position().map(csv::Position::line)
            );
            continue;
        };
        entries.push((identifier.to_string(), hash.to_string()));
    }
    Ok(entries)
}
