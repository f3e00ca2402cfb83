//! Ledger domain types for journal creation and maintenance.
//!
//! This module defines the input types used when creating and editing
//! journals, plus the debit/credit totals derived from a line set.

use chrono::NaiveDate;
use folio_shared::types::{AccountId, BookId, ContactId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::LedgerEntry;
use super::journal::DocType;
use super::validation::within_tolerance;

/// Input for a single journal line.
///
/// Amounts are signed in the book's base currency: positive is a debit,
/// negative is a credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Signed amount in the book's base currency.
    pub amount_dc: Decimal,
    /// Optional counterparty.
    pub contact_id: Option<ContactId>,
    /// Optional description for this line.
    pub description: Option<String>,
    /// Original transaction-currency amount, when foreign.
    pub amount_txn: Option<Decimal>,
    /// Exchange rate used to arrive at `amount_dc`.
    pub fx_rate: Option<Decimal>,
}

impl LineInput {
    /// Creates a base-currency line with no optional metadata.
    #[must_use]
    pub const fn new(account_id: AccountId, amount_dc: Decimal) -> Self {
        Self {
            account_id,
            amount_dc,
            contact_id: None,
            description: None,
            amount_txn: None,
            fx_rate: None,
        }
    }
}

/// Input for creating a new journal.
#[derive(Debug, Clone)]
pub struct CreateJournalInput {
    /// The book this journal belongs to.
    pub book_id: BookId,
    /// Document type.
    pub doc_type: DocType,
    /// Document date.
    pub doc_date: NaiveDate,
    /// Currency code (ISO 4217).
    pub currency: String,
    /// Optional free-text narration.
    pub narration: Option<String>,
    /// The journal lines (must have at least 2).
    pub lines: Vec<LineInput>,
    /// The user creating the journal.
    pub created_by: UserId,
}

/// Input for editing a draft journal.
///
/// `None` leaves a field unchanged. `narration` uses the double-`Option`
/// convention: `Some(None)` clears it. Replacing `lines` re-runs the full
/// validation rule set and reassigns line numbers.
#[derive(Debug, Clone, Default)]
pub struct UpdateJournalInput {
    /// New document date.
    pub doc_date: Option<NaiveDate>,
    /// New currency code.
    pub currency: Option<String>,
    /// New narration (`Some(None)` clears it).
    pub narration: Option<Option<String>>,
    /// Full replacement line set.
    pub lines: Option<Vec<LineInput>>,
}

/// Debit/credit totals for a line set, for validation and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of positive (debit) amounts.
    pub debit_total: Decimal,
    /// Sum of negative (credit) amounts, as a positive number.
    pub credit_total: Decimal,
    /// Signed sum of all lines.
    pub net: Decimal,
    /// Whether the lines balance within the rounding tolerance.
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Computes totals from input lines.
    #[must_use]
    pub fn of_lines(lines: &[LineInput]) -> Self {
        Self::from_amounts(lines.iter().map(|line| line.amount_dc))
    }

    /// Computes totals from persisted entries.
    #[must_use]
    pub fn of_entries(entries: &[LedgerEntry]) -> Self {
        Self::from_amounts(entries.iter().map(|entry| entry.amount_dc))
    }

    fn from_amounts(amounts: impl Iterator<Item = Decimal>) -> Self {
        let mut debit_total = Decimal::ZERO;
        let mut credit_total = Decimal::ZERO;
        for amount in amounts {
            if amount > Decimal::ZERO {
                debit_total += amount;
            } else {
                credit_total -= amount;
            }
        }
        let net = debit_total - credit_total;
        Self {
            debit_total,
            credit_total,
            net,
            is_balanced: within_tolerance(net),
        }
    }
}
