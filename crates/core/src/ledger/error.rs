//! Ledger error types for validation and journal state errors.
//!
//! This module defines all errors that can occur during journal operations:
//! line validation errors, account precondition errors, posting state
//! errors, and storage failures surfaced through the engine.

use folio_shared::types::{AccountId, JournalId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Journal must have at least 2 lines.
    #[error("Journal must have at least 2 lines")]
    InsufficientLines,

    /// A line has a zero amount.
    #[error("Line {line} has a zero amount")]
    ZeroAmount {
        /// 1-based index of the offending line.
        line: usize,
    },

    /// A line carries a non-positive exchange rate.
    #[error("Line {line} has a non-positive exchange rate")]
    InvalidFxRate {
        /// 1-based index of the offending line.
        line: usize,
    },

    /// Journal lines do not sum to zero within the rounding tolerance.
    #[error("Journal is not balanced. Sum of signed amounts: {sum}")]
    Unbalanced {
        /// Actual signed sum of the lines.
        sum: Decimal,
    },

    // ========== Account Errors ==========
    /// Referenced account does not exist in the journal's book.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    /// Account is inactive and cannot take new postings.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Account does not allow direct posting.
    #[error("Account {0} does not allow direct posting")]
    AccountNotPostable(AccountId),

    // ========== Journal State Errors ==========
    /// Journal not found.
    #[error("Journal not found: {0}")]
    NotFound(JournalId),

    /// Journal is already posted; posting is a one-way transition.
    #[error("Journal {0} is already posted")]
    AlreadyPosted(JournalId),

    /// Journal has not been posted; only posted history can be reversed.
    #[error("Journal {0} is not posted")]
    NotPosted(JournalId),

    // ========== Storage Errors ==========
    /// The storage layer failed; no partial state was left behind.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::ZeroAmount { .. } => "ZERO_AMOUNT",
            Self::InvalidFxRate { .. } => "INVALID_FX_RATE",
            Self::Unbalanced { .. } => "UNBALANCED_JOURNAL",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::AccountNotPostable(_) => "ACCOUNT_NOT_POSTABLE",
            Self::NotFound(_) => "JOURNAL_NOT_FOUND",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::NotPosted(_) => "NOT_POSTED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Only storage failures qualify; validation and state errors will fail
    /// the same way again. `AlreadyPosted` after a retry means the first
    /// attempt succeeded and is a safe no-op signal for the caller.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
