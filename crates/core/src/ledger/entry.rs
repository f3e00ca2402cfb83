//! Ledger entry domain types.

use chrono::{DateTime, Utc};
use folio_shared::types::{AccountId, ContactId, JournalId, LedgerEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line of a journal.
///
/// Amounts are signed in the book's base currency: positive is a debit,
/// negative is a credit. `amount_dc` is never zero. Entries are owned by
/// their journal and never outlive or detach from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    pub id: LedgerEntryId,
    /// The journal this entry belongs to.
    pub journal_id: JournalId,
    /// 1-based position within the journal, assigned by input order.
    pub line_no: u32,
    /// The account affected by this entry.
    pub account_id: AccountId,
    /// Optional counterparty.
    pub contact_id: Option<ContactId>,
    /// Optional description for this line.
    pub description: Option<String>,
    /// Signed amount in the book's base currency (positive = debit).
    pub amount_dc: Decimal,
    /// Original transaction-currency amount, when the journal is foreign.
    pub amount_txn: Option<Decimal>,
    /// Exchange rate used to arrive at `amount_dc`.
    pub fx_rate: Option<Decimal>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Returns true if this line is a debit.
    #[must_use]
    pub fn is_debit(&self) -> bool {
        self.amount_dc > Decimal::ZERO
    }

    /// Returns the debit column amount (zero for credit lines).
    #[must_use]
    pub fn debit_amount(&self) -> Decimal {
        if self.amount_dc > Decimal::ZERO {
            self.amount_dc
        } else {
            Decimal::ZERO
        }
    }

    /// Returns the credit column amount (zero for debit lines).
    #[must_use]
    pub fn credit_amount(&self) -> Decimal {
        if self.amount_dc < Decimal::ZERO {
            -self.amount_dc
        } else {
            Decimal::ZERO
        }
    }
}
