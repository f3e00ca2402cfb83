//! Reversal line construction.
//!
//! A reversal is an ordinary journal whose lines mirror a posted
//! journal with every signed amount negated. Posting it walks each
//! balance back by exactly what the original applied.

use super::entry::LedgerEntry;
use super::types::LineInput;

/// Builds sign-flipped line inputs from a posted journal's entries.
///
/// Both `amount_dc` and `amount_txn` (when present) are negated;
/// `fx_rate` and `contact_id` carry over unchanged. Line descriptions
/// are prefixed with `Reversal: `.
#[must_use]
pub fn reversing_lines(entries: &[LedgerEntry]) -> Vec<LineInput> {
    entries
        .iter()
        .map(|entry| LineInput {
            account_id: entry.account_id,
            amount_dc: -entry.amount_dc,
            contact_id: entry.contact_id,
            description: entry
                .description
                .as_ref()
                .map(|description| format!("Reversal: {description}")),
            amount_txn: entry.amount_txn.map(|amount| -amount),
            fx_rate: entry.fx_rate,
        })
        .collect()
}

/// Derives a reversal document number from the original's.
///
/// Keeps the numeric suffix so the pair stays visually linked:
/// `INV-000042` becomes `REV-000042`. A number without a separator is
/// kept whole.
#[must_use]
pub fn reversal_doc_no(original: &str) -> String {
    let suffix = original.rsplit_once('-').map_or(original, |(_, tail)| tail);
    format!("REV-{suffix}")
}
