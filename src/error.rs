//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the simsieve CLI.
///
/// - 0: Success (completed normally, similar records found)
/// - 1: General error (unexpected failure)
/// - 2: No matches (completed normally, nothing similar)
/// - 3: Partial success (completed with skipped entries or failed queries)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: at least one similar record was found.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// No matches: queries ran but nothing similar was cached.
    NoMatches = 2,
    /// Partial success: some entries were skipped or failed.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "SV000",
            Self::GeneralError => "SV001",
            Self::NoMatches => "SV002",
            Self::PartialSuccess => "SV003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "SV001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
