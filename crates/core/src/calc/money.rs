//! Cent-level money helpers.
//!
//! Percentages are `Decimal` so the rounding step is exact; results are
//! always whole cents.

use rust_decimal::prelude::*;

/// Computes `percentage`% of `total_cents`, rounded to the nearest cent.
///
/// Midpoints round away from zero (half-up for the non-negative amounts
/// schedules deal in).
///
/// ```
/// use rust_decimal_macros::dec;
/// use wayfare_core::calc::percentage_of_cents;
///
/// assert_eq!(percentage_of_cents(10001, dec!(60)), 6001);
/// assert_eq!(percentage_of_cents(10001, dec!(40)), 4000);
/// ```
#[must_use]
pub fn percentage_of_cents(total_cents: i64, percentage: Decimal) -> i64 {
    let exact = Decimal::from(total_cents) * percentage / Decimal::ONE_HUNDRED;
    exact
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        // Only reachable for percentages far outside 0..=100.
        .unwrap_or(if exact.is_sign_negative() { i64::MIN } else { i64::MAX })
}

/// Sums cent amounts in `i128`, which cannot overflow for any slice of `i64`.
#[must_use]
pub fn sum_cents(amounts: impl IntoIterator<Item = i64>) -> i128 {
    amounts.into_iter().map(i128::from).sum()
}

/// Narrows a wide cent amount to `i64`, saturating at the bounds.
#[must_use]
pub fn saturate_cents(cents: i128) -> i64 {
    i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX })
}

/// A line that carries a sequence position and a cent amount.
pub trait SequencedAmount {
    /// Position of the line within its schedule.
    fn sequence_order(&self) -> i32;
    /// Amount in cents.
    fn amount_cents(&self) -> i64;
    /// Mutable access to the amount in cents.
    fn amount_cents_mut(&mut self) -> &mut i64;
}

/// Forces `items` to sum to `target_total`.
///
/// The whole difference goes to the item with the highest sequence order
/// (the balance payment). Returns the signed adjustment applied, which is
/// zero when the items already reconcile or when `items` is empty.
///
/// An adjustment that would push the balance item past the `i64` range
/// saturates, leaving a residual mismatch for the sum check to report.
pub fn reconcile_rounding_error<T: SequencedAmount>(items: &mut [T], target_total: i64) -> i64 {
    let sum = sum_cents(items.iter().map(SequencedAmount::amount_cents));
    let difference = i128::from(target_total) - sum;
    if difference == 0 {
        return 0;
    }

    let Some(last) = items.iter_mut().max_by_key(|item| item.sequence_order()) else {
        return 0;
    };
    let amount = last.amount_cents_mut();
    let before = *amount;
    *amount = saturate_cents(i128::from(before) + difference);
    saturate_cents(i128::from(*amount) - i128::from(before))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[derive(Debug, Clone, PartialEq)]
    struct Line {
        seq: i32,
        cents: i64,
    }

    impl SequencedAmount for Line {
        fn sequence_order(&self) -> i32 {
            self.seq
        }
        fn amount_cents(&self) -> i64 {
            self.cents
        }
        fn amount_cents_mut(&mut self) -> &mut i64 {
            &mut self.cents
        }
    }

    #[rstest]
    #[case(10000, dec!(25), 2500)]
    #[case(10001, dec!(60), 6001)]
    #[case(10001, dec!(40), 4000)]
    #[case(333, dec!(50), 167)]
    #[case(100, dec!(33.33), 33)]
    #[case(150, dec!(33.33), 50)]
    #[case(0, dec!(100), 0)]
    #[case(12345, dec!(0), 0)]
    #[case(12345, dec!(100), 12345)]
    fn test_percentage_of_cents(#[case] total: i64, #[case] pct: Decimal, #[case] expected: i64) {
        assert_eq!(percentage_of_cents(total, pct), expected);
    }

    #[test]
    fn test_percentage_midpoint_rounds_up() {
        // 5% of 10 cents = 0.5 cents
        assert_eq!(percentage_of_cents(10, dec!(5)), 1);
        // 50% of 1 cent = 0.5 cents
        assert_eq!(percentage_of_cents(1, dec!(50)), 1);
    }

    #[test]
    fn test_reconcile_assigns_difference_to_highest_sequence() {
        let mut items = vec![Line { seq: 1, cents: 6001 }, Line { seq: 2, cents: 4001 }];
        let applied = reconcile_rounding_error(&mut items, 10001);

        assert_eq!(applied, -1);
        assert_eq!(items[0].cents, 6001);
        assert_eq!(items[1].cents, 4000);
    }

    #[test]
    fn test_reconcile_uses_sequence_not_position() {
        let mut items = vec![Line { seq: 3, cents: 100 }, Line { seq: 1, cents: 100 }];
        reconcile_rounding_error(&mut items, 205);

        assert_eq!(items[0].cents, 105);
        assert_eq!(items[1].cents, 100);
    }

    #[test]
    fn test_reconcile_noop_when_balanced() {
        let mut items = vec![Line { seq: 1, cents: 50 }, Line { seq: 2, cents: 50 }];
        assert_eq!(reconcile_rounding_error(&mut items, 100), 0);
        assert_eq!(items, vec![Line { seq: 1, cents: 50 }, Line { seq: 2, cents: 50 }]);
    }

    #[rstest]
    #[case(vec![i64::MAX, 1], i128::from(i64::MAX) + 1)]
    #[case(vec![i64::MAX, i64::MAX], 2 * i128::from(i64::MAX))]
    #[case(vec![i64::MAX, i64::MIN], -1)]
    fn test_sum_cents_does_not_overflow(#[case] amounts: Vec<i64>, #[case] expected: i128) {
        assert_eq!(sum_cents(amounts), expected);
    }

    #[test]
    fn test_saturate_cents_clamps_to_bounds() {
        assert_eq!(saturate_cents(i128::from(i64::MAX) + 1), i64::MAX);
        assert_eq!(saturate_cents(i128::from(i64::MIN) - 1), i64::MIN);
        assert_eq!(saturate_cents(42), 42);
    }

    #[test]
    fn test_reconcile_saturates_instead_of_overflowing() {
        let mut items = vec![Line { seq: 1, cents: -10 }, Line { seq: 2, cents: i64::MAX - 5 }];
        let applied = reconcile_rounding_error(&mut items, i64::MAX);

        assert_eq!(items[1].cents, i64::MAX);
        assert_eq!(applied, 5);
    }

    #[test]
    fn test_reconcile_empty_is_noop() {
        let mut items: Vec<Line> = vec![];
        assert_eq!(reconcile_rounding_error(&mut items, 100), 0);
    }
}
