//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Accounts and the chart-of-accounts vocabulary
//! - Journals and the draft/posted state machine
//! - Ledger entries with signed amounts
//! - Validation rules for journal lines
//! - Signed balance delta arithmetic
//! - Reversal line construction
//! - Error types for ledger operations

pub mod account;
pub mod balance;
pub mod entry;
pub mod error;
pub mod journal;
pub mod reversal;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use account::{Account, AccountType, NormalBalance};
pub use balance::{balance_deltas, debit_credit_columns};
pub use entry::LedgerEntry;
pub use error::LedgerError;
pub use journal::{DocType, Journal, JournalState};
pub use reversal::{reversal_doc_no, reversing_lines};
pub use types::{CreateJournalInput, JournalTotals, LineInput, UpdateJournalInput};
pub use validation::{
    ROUNDING_TOLERANCE, check_postable, validate_entries, validate_lines, within_tolerance,
};
