//! Property-based tests for cache recomputation.
//!
//! - Recomputing twice yields the same state
//! - Any deletion order converges to the same final state
//! - The paid amount is never negative

use chrono::NaiveDate;
use proptest::prelude::*;

use super::sync::PaymentCacheService;
use super::types::{Movement, TransactionType};

fn movement() -> impl Strategy<Value = Movement> {
    (
        prop_oneof![
            Just(TransactionType::Payment),
            Just(TransactionType::Refund),
            Just(TransactionType::Adjustment),
        ],
        0i64..100_000,
    )
        .prop_map(|(transaction_type, amount_cents)| Movement {
            transaction_type,
            amount_cents,
        })
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_recompute_is_idempotent(
        expected in 0i64..200_000,
        due_offset in -30i64..30,
        movements in prop::collection::vec(movement(), 0..20),
    ) {
        let due = today().checked_add_signed(chrono::Duration::days(due_offset));
        let first = PaymentCacheService::recompute(expected, due, &movements, today());
        let second = PaymentCacheService::recompute(expected, due, &movements, today());
        prop_assert_eq!(first, second);
        prop_assert!(first.paid_amount_cents >= 0);
    }

    #[test]
    fn prop_delete_order_converges(
        expected in 0i64..200_000,
        (movements, deletion_order, keep) in prop::collection::vec(movement(), 1..15)
            .prop_flat_map(|movements| {
                let len = movements.len();
                (
                    Just(movements),
                    Just((0..len).collect::<Vec<usize>>()).prop_shuffle(),
                    0..=len,
                )
            }),
    ) {
        // Delete from the back, resyncing after each.
        let mut reverse = movements.clone();
        let mut reverse_state = PaymentCacheService::recompute(expected, None, &reverse, today());
        while reverse.len() > keep {
            reverse.pop();
            reverse_state = PaymentCacheService::recompute(expected, None, &reverse, today());
        }

        // Delete the same transactions in shuffled order.
        let mut remaining: Vec<Option<Movement>> = movements.iter().copied().map(Some).collect();
        let mut shuffled_state =
            PaymentCacheService::recompute(expected, None, &movements, today());
        for index in deletion_order.into_iter().filter(|index| *index >= keep) {
            remaining[index] = None;
            let live: Vec<Movement> = remaining.iter().flatten().copied().collect();
            shuffled_state = PaymentCacheService::recompute(expected, None, &live, today());
        }

        prop_assert_eq!(shuffled_state, reverse_state);
    }
}
