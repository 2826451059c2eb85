//! Paid-amount cache recomputation.

use chrono::NaiveDate;

use super::types::{ItemPaymentState, Movement, PaymentStatus};
use crate::calc::{saturate_cents, sum_cents};

/// Recomputes an item's cached payment state from its full transaction set.
pub struct PaymentCacheService;

impl PaymentCacheService {
    /// Recomputes `paid_amount_cents` and `status` for one item.
    ///
    /// Payments and adjustments add, refunds subtract, and the result is
    /// clamped at zero. The outcome depends only on the set of movements,
    /// never on their order or on the previous cached value. The running
    /// total is kept in `i128`; a net above `i64::MAX` caches as `i64::MAX`.
    #[must_use]
    pub fn recompute(
        expected_amount_cents: i64,
        due_date: Option<NaiveDate>,
        movements: &[Movement],
        today: NaiveDate,
    ) -> ItemPaymentState {
        let net = sum_cents(
            movements
                .iter()
                .map(|m| m.transaction_type.signed(m.amount_cents)),
        );
        let paid_amount_cents = saturate_cents(net.max(0));

        ItemPaymentState {
            paid_amount_cents,
            status: Self::derive_status(expected_amount_cents, paid_amount_cents, due_date, today),
        }
    }

    /// Status for a paid amount against an expected amount.
    #[must_use]
    pub fn derive_status(
        expected_amount_cents: i64,
        paid_amount_cents: i64,
        due_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> PaymentStatus {
        if paid_amount_cents >= expected_amount_cents {
            PaymentStatus::Paid
        } else if paid_amount_cents > 0 {
            PaymentStatus::Partial
        } else if due_date.is_some_and(|due| due < today) {
            PaymentStatus::Overdue
        } else {
            PaymentStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::TransactionType;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payment(cents: i64) -> Movement {
        Movement {
            transaction_type: TransactionType::Payment,
            amount_cents: cents,
        }
    }

    fn refund(cents: i64) -> Movement {
        Movement {
            transaction_type: TransactionType::Refund,
            amount_cents: cents,
        }
    }

    #[test]
    fn test_status_progression() {
        let today = date(2025, 3, 1);
        let due = Some(date(2025, 4, 1));
        let mut movements = vec![];

        let state = PaymentCacheService::recompute(50_000, due, &movements, today);
        assert_eq!(state.status, PaymentStatus::Pending);
        assert_eq!(state.paid_amount_cents, 0);

        movements.push(payment(25_000));
        let state = PaymentCacheService::recompute(50_000, due, &movements, today);
        assert_eq!(state.status, PaymentStatus::Partial);
        assert_eq!(state.paid_amount_cents, 25_000);

        movements.push(payment(25_000));
        let state = PaymentCacheService::recompute(50_000, due, &movements, today);
        assert_eq!(state.status, PaymentStatus::Paid);
        assert_eq!(state.paid_amount_cents, 50_000);

        movements.push(refund(50_000));
        let state = PaymentCacheService::recompute(50_000, due, &movements, today);
        assert_eq!(state.status, PaymentStatus::Pending);
        assert_eq!(state.paid_amount_cents, 0);

        let state = PaymentCacheService::recompute(50_000, due, &movements, date(2025, 4, 2));
        assert_eq!(state.status, PaymentStatus::Overdue);
    }

    #[test]
    fn test_refund_clamps_at_zero() {
        let state = PaymentCacheService::recompute(
            10_000,
            None,
            &[payment(1_000), refund(5_000)],
            date(2025, 1, 1),
        );
        assert_eq!(state.paid_amount_cents, 0);
        assert_eq!(state.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_adjustment_counts_as_payment() {
        let adjustment = Movement {
            transaction_type: TransactionType::Adjustment,
            amount_cents: 10_000,
        };
        let state = PaymentCacheService::recompute(10_000, None, &[adjustment], date(2025, 1, 1));
        assert_eq!(state.status, PaymentStatus::Paid);
    }

    #[rstest]
    #[case(vec![payment(i64::MAX), payment(1)], i64::MAX, PaymentStatus::Paid)]
    #[case(vec![payment(i64::MAX), payment(i64::MAX), refund(i64::MAX)], i64::MAX, PaymentStatus::Paid)]
    #[case(vec![payment(i64::MAX), refund(i64::MAX), refund(1)], 0, PaymentStatus::Pending)]
    fn test_huge_amounts_do_not_overflow(
        #[case] movements: Vec<Movement>,
        #[case] paid: i64,
        #[case] status: PaymentStatus,
    ) {
        let state = PaymentCacheService::recompute(50_000, None, &movements, date(2025, 1, 1));
        assert_eq!(state.paid_amount_cents, paid);
        assert_eq!(state.status, status);
    }

    #[rstest]
    #[case(0, 0, None, PaymentStatus::Paid)]
    #[case(100, 150, None, PaymentStatus::Paid)]
    #[case(100, 1, Some((2024, 1, 1)), PaymentStatus::Partial)]
    #[case(100, 0, Some((2025, 5, 31)), PaymentStatus::Overdue)]
    #[case(100, 0, Some((2025, 6, 1)), PaymentStatus::Pending)]
    #[case(100, 0, None, PaymentStatus::Pending)]
    fn test_derive_status(
        #[case] expected: i64,
        #[case] paid: i64,
        #[case] due: Option<(i32, u32, u32)>,
        #[case] status: PaymentStatus,
    ) {
        let due = due.map(|(y, m, d)| date(y, m, d));
        assert_eq!(
            PaymentCacheService::derive_status(expected, paid, due, date(2025, 6, 1)),
            status
        );
    }
}
