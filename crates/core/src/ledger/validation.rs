//! Validation rules for journal lines.
//!
//! The same rules run when a journal is created and again when it is
//! posted, so a draft that drifted out of shape (or an account that was
//! deactivated in between) is caught before any balance changes.

use rust_decimal::Decimal;

use super::account::Account;
use super::entry::LedgerEntry;
use super::error::LedgerError;
use super::types::LineInput;

/// Maximum absolute sum of signed line amounts for a journal to count
/// as balanced. Absorbs rounding residue from currency conversion.
pub const ROUNDING_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns true if `sum` is within the rounding tolerance of zero.
#[must_use]
pub fn within_tolerance(sum: Decimal) -> bool {
    sum.abs() <= ROUNDING_TOLERANCE
}

/// Validates journal line inputs before a journal is created.
///
/// Rules run in order; the first failure wins:
/// 1. At least 2 lines.
/// 2. No line may have a zero signed amount.
/// 3. An exchange rate, when present, must be positive.
/// 4. Signed amounts must sum to zero within [`ROUNDING_TOLERANCE`].
///
/// # Errors
///
/// Returns `InsufficientLines`, `ZeroAmount`, `InvalidFxRate`, or
/// `Unbalanced`. Line numbers in errors are 1-based.
pub fn validate_lines(lines: &[LineInput]) -> Result<(), LedgerError> {
    run_rules(lines.iter().map(|line| (line.amount_dc, line.fx_rate)))
}

/// Validates stored ledger entries before a journal is posted.
///
/// Applies the same rules as [`validate_lines`], so posting re-checks
/// everything creation checked.
///
/// # Errors
///
/// Returns `InsufficientLines`, `ZeroAmount`, `InvalidFxRate`, or
/// `Unbalanced`. Line numbers in errors are 1-based.
pub fn validate_entries(entries: &[LedgerEntry]) -> Result<(), LedgerError> {
    run_rules(entries.iter().map(|entry| (entry.amount_dc, entry.fx_rate)))
}

fn run_rules<I>(lines: I) -> Result<(), LedgerError>
where
    I: ExactSizeIterator<Item = (Decimal, Option<Decimal>)>,
{
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientLines);
    }

    let mut sum = Decimal::ZERO;
    for (idx, (amount_dc, fx_rate)) in lines.enumerate() {
        if amount_dc.is_zero() {
            return Err(LedgerError::ZeroAmount { line: idx + 1 });
        }
        if let Some(rate) = fx_rate
            && rate <= Decimal::ZERO
        {
            return Err(LedgerError::InvalidFxRate { line: idx + 1 });
        }
        sum += amount_dc;
    }

    if !within_tolerance(sum) {
        return Err(LedgerError::Unbalanced { sum });
    }

    Ok(())
}

/// Checks that an account can take a posting.
///
/// # Errors
///
/// Returns `AccountInactive` if the account is deactivated, or
/// `AccountNotPostable` if it is a summary account.
pub fn check_postable(account: &Account) -> Result<(), LedgerError> {
    if !account.is_active {
        return Err(LedgerError::AccountInactive(account.id));
    }
    if !account.is_postable {
        return Err(LedgerError::AccountNotPostable(account.id));
    }
    Ok(())
}
