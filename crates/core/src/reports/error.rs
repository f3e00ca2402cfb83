//! Report error types.

use chrono::NaiveDate;
use folio_shared::types::AccountId;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Account not found in the book.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// The storage layer failed while reading report data.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}
