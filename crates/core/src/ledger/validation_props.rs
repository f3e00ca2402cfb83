//! Property-based tests for journal line validation rules.

use folio_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::LineInput;
use super::validation::{ROUNDING_TOLERANCE, validate_lines};

/// Strategy to generate a non-zero signed amount.
fn nonzero_amount() -> impl Strategy<Value = Decimal> {
    // Amounts from 0.01 to 1,000,000.00, either sign
    (1i64..100_000_000i64, any::<bool>())
        .prop_map(|(cents, negative)| Decimal::new(if negative { -cents } else { cents }, 2))
}

/// Strategy to generate a positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Helper to create a line input for testing.
fn make_line(amount_dc: Decimal) -> LineInput {
    LineInput::new(AccountId::new(), amount_dc)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: Mirrored pairs always validate**
    ///
    /// *For any* non-zero amount, a two-line journal of that amount and
    /// its negation passes validation.
    #[test]
    fn prop_mirrored_pair_accepted(amount in nonzero_amount()) {
        let lines = vec![make_line(amount), make_line(-amount)];

        let result = validate_lines(&lines);
        prop_assert!(result.is_ok(), "mirrored pair should pass, got: {:?}", result);
    }

    /// **Property: Split postings validate when they sum to zero**
    ///
    /// *For any* two positive amounts, debiting them separately and
    /// crediting the total passes validation.
    #[test]
    fn prop_split_posting_accepted(
        amount1 in positive_amount(),
        amount2 in positive_amount(),
    ) {
        let lines = vec![
            make_line(amount1),
            make_line(amount2),
            make_line(-(amount1 + amount2)),
        ];

        let result = validate_lines(&lines);
        prop_assert!(result.is_ok(), "split posting should pass, got: {:?}", result);
    }

    /// **Property: Residue within a cent is tolerated**
    ///
    /// *For any* balanced pair and any residue of at most one cent in
    /// either direction, validation still passes. The base amount stays
    /// above a cent so the residue cannot zero a line out.
    #[test]
    fn prop_one_cent_residue_accepted(
        amount in (2i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
        residue_cents in -1i64..=1i64,
    ) {
        let residue = Decimal::new(residue_cents, 2);
        let lines = vec![make_line(amount + residue), make_line(-amount)];

        let result = validate_lines(&lines);
        prop_assert!(
            result.is_ok(),
            "residue {} should be within tolerance, got: {:?}",
            residue,
            result
        );
    }

    /// **Property: Residue beyond a cent is rejected with the sum**
    ///
    /// *For any* imbalance of two cents or more, carried on its own
    /// line, validation fails with `Unbalanced` reporting the exact
    /// signed sum.
    #[test]
    fn prop_larger_residue_rejected(
        amount in positive_amount(),
        residue_cents in 2i64..10_000i64,
        negative in any::<bool>(),
    ) {
        let residue = Decimal::new(if negative { -residue_cents } else { residue_cents }, 2);
        let lines = vec![make_line(amount), make_line(-amount), make_line(residue)];

        match validate_lines(&lines) {
            Err(LedgerError::Unbalanced { sum }) => prop_assert_eq!(sum, residue),
            other => prop_assert!(false, "expected Unbalanced, got: {:?}", other),
        }
    }

    /// **Property: A zero line is rejected and named**
    ///
    /// *For any* balanced journal and any insertion point, adding a
    /// zero-amount line fails with that line's 1-based number.
    #[test]
    fn prop_zero_line_is_named(
        amount in positive_amount(),
        position in 0usize..=2usize,
    ) {
        let mut lines = vec![make_line(amount), make_line(-amount)];
        lines.insert(position, make_line(Decimal::ZERO));

        match validate_lines(&lines) {
            Err(LedgerError::ZeroAmount { line }) => prop_assert_eq!(line, position + 1),
            other => prop_assert!(false, "expected ZeroAmount, got: {:?}", other),
        }
    }

    /// **Property: Single lines are always rejected**
    ///
    /// *For any* amount, a one-line journal fails with
    /// `InsufficientLines` before any other rule runs.
    #[test]
    fn prop_single_line_rejected(amount in nonzero_amount()) {
        let lines = vec![make_line(amount)];

        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::InsufficientLines)),
            "single line should be rejected, got: {:?}",
            result
        );
    }

    /// **Property: Sign-flipping a valid journal keeps it valid**
    ///
    /// *For any* balanced journal, negating every line still validates.
    /// Reversals are built exactly this way.
    #[test]
    fn prop_flipped_journal_still_valid(
        amount1 in positive_amount(),
        amount2 in positive_amount(),
    ) {
        let lines = vec![
            make_line(amount1),
            make_line(amount2),
            make_line(-(amount1 + amount2)),
        ];
        let flipped: Vec<LineInput> = lines
            .iter()
            .map(|line| make_line(-line.amount_dc))
            .collect();

        prop_assert!(validate_lines(&lines).is_ok());
        prop_assert!(validate_lines(&flipped).is_ok());
    }

    /// **Property: Non-positive exchange rates are rejected**
    ///
    /// *For any* rate at or below zero, validation fails with
    /// `InvalidFxRate` naming the line.
    #[test]
    fn prop_nonpositive_fx_rate_rejected(
        amount in positive_amount(),
        rate_cents in -100_000i64..=0i64,
    ) {
        let mut bad = make_line(amount);
        bad.fx_rate = Some(Decimal::new(rate_cents, 2));
        let lines = vec![bad, make_line(-amount)];

        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidFxRate { line: 1 })),
            "rate {} should be rejected, got: {:?}",
            Decimal::new(rate_cents, 2),
            result
        );
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// The tolerance constant itself is one cent.
    #[test]
    fn test_tolerance_is_one_cent() {
        assert_eq!(ROUNDING_TOLERANCE, Decimal::new(1, 2));
    }
}
