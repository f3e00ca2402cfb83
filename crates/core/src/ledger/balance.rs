//! Signed balance arithmetic.
//!
//! Balances are stored as signed numbers where positive means net debit
//! and negative means net credit. Posting a journal adds each line's
//! signed amount to its account; reports split the signed net back into
//! debit and credit columns for display.

use std::collections::HashMap;

use folio_shared::types::AccountId;
use rust_decimal::Decimal;

use super::entry::LedgerEntry;

/// Sums the signed amounts of `entries` per account.
///
/// The result is the exact set of balance changes that posting the
/// journal applies. An account hit by several lines gets one combined
/// delta, so the store touches each account at most once.
#[must_use]
pub fn balance_deltas(entries: &[LedgerEntry]) -> HashMap<AccountId, Decimal> {
    let mut deltas: HashMap<AccountId, Decimal> = HashMap::new();
    for entry in entries {
        *deltas.entry(entry.account_id).or_default() += entry.amount_dc;
    }
    deltas
}

/// Splits a signed net balance into display columns.
///
/// A positive net lands in the debit column; a negative net lands in
/// the credit column as a positive number. At most one side is
/// non-zero.
#[must_use]
pub fn debit_credit_columns(net: Decimal) -> (Decimal, Decimal) {
    if net >= Decimal::ZERO {
        (net, Decimal::ZERO)
    } else {
        (Decimal::ZERO, -net)
    }
}
