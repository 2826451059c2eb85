//! Property-based tests for cent arithmetic.
//!
//! - Rounded percentage shares never drift more than one cent per item
//! - Reconciliation always restores the exact target total

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::money::{SequencedAmount, percentage_of_cents, reconcile_rounding_error};

#[derive(Debug, Clone)]
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

/// Strategy for percentages with two decimal places that sum to exactly 100.
fn percentages_summing_to_100() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1u32..5_000, 1..12).prop_map(|weights| {
        let total: u32 = weights.iter().sum();
        let mut basis_points: Vec<u32> = weights.iter().map(|w| w * 10_000 / total).collect();
        let assigned: u32 = basis_points.iter().sum();
        if let Some(last) = basis_points.last_mut() {
            *last += 10_000 - assigned;
        }
        basis_points
            .into_iter()
            .map(|bp| Decimal::new(i64::from(bp), 2))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_percentage_within_half_cent_of_exact(
        total in 0i64..100_000_000,
        basis_points in 0i64..=10_000,
    ) {
        let pct = Decimal::new(basis_points, 2);
        let rounded = Decimal::from(percentage_of_cents(total, pct));
        let exact = Decimal::from(total) * pct / Decimal::ONE_HUNDRED;
        prop_assert!((rounded - exact).abs() <= Decimal::new(5, 1));
    }

    #[test]
    fn prop_reconciled_shares_sum_to_total(
        total in 0i64..100_000_000,
        percentages in percentages_summing_to_100(),
    ) {
        let mut lines: Vec<Line> = percentages
            .iter()
            .zip(1..)
            .map(|(pct, seq)| Line { seq, cents: percentage_of_cents(total, *pct) })
            .collect();
        let before: Vec<i64> = lines.iter().map(|l| l.cents).collect();

        reconcile_rounding_error(&mut lines, total);

        let sum: i64 = lines.iter().map(|l| l.cents).sum();
        prop_assert_eq!(sum, total);

        // Only the final line moves.
        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate().take(last) {
            prop_assert_eq!(line.cents, before[i]);
        }
    }
}
