//! Property-based tests for template resolution.
//!
//! - Resolved and reconciled items always sum to the requested total
//! - Only the highest-sequence item absorbs the rounding remainder
//! - Direct item sets pass the sum check exactly when they add up

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::ScheduleService;
use super::types::{ExpectedItemInput, TemplateApplication};
use crate::calc::reconcile_rounding_error;
use crate::template::{AmountSpec, TemplateItem, TimingSpec};

fn application(total: i64) -> TemplateApplication {
    TemplateApplication {
        total_amount_cents: total,
        booking_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        departure_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
    }
}

/// Percentage items (two decimal places) summing to exactly 100.
fn percentage_items() -> impl Strategy<Value = Vec<TemplateItem>> {
    prop::collection::vec((1u32..1_000, 0u32..300), 1..12).prop_map(|specs| {
        let weight_total: u32 = specs.iter().map(|(w, _)| w).sum();
        let mut basis_points: Vec<u32> = specs
            .iter()
            .map(|(w, _)| w * 10_000 / weight_total)
            .collect();
        let assigned: u32 = basis_points.iter().sum();
        if let Some(last) = basis_points.last_mut() {
            *last += 10_000 - assigned;
        }

        basis_points
            .into_iter()
            .zip(specs)
            .zip(1..)
            .map(|((bp, (_, days)), seq)| TemplateItem {
                sequence_order: seq,
                payment_name: format!("Payment {seq}"),
                amount: AmountSpec::Percentage(Decimal::new(i64::from(bp), 2)),
                timing: TimingSpec::BeforeDeparture(days),
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_resolved_percentages_sum_to_total(
        total in 0i64..50_000_000,
        items in percentage_items(),
    ) {
        let mut resolved = ScheduleService::resolve_template(&items, &application(total)).unwrap();
        let before: Vec<i64> = resolved.iter().map(|i| i.expected_amount_cents).collect();

        reconcile_rounding_error(&mut resolved, total);

        let sum: i64 = resolved.iter().map(|i| i.expected_amount_cents).sum();
        prop_assert_eq!(sum, total);

        // Remainder is at most half a cent per item.
        let last = resolved.len() - 1;
        let drift = (resolved[last].expected_amount_cents - before[last]).unsigned_abs();
        prop_assert!(drift <= resolved.len() as u64);
        for (item, original) in resolved.iter().zip(&before).take(last) {
            prop_assert_eq!(item.expected_amount_cents, *original);
        }
    }

    #[test]
    fn prop_mixed_items_reconcile_to_total(
        total in 1_000i64..10_000_000,
        fixed in prop::collection::vec(100i64..500, 0..4),
        pct in 0i64..=100,
    ) {
        let mut items: Vec<TemplateItem> = fixed
            .iter()
            .zip(1..)
            .map(|(cents, seq)| TemplateItem {
                sequence_order: seq,
                payment_name: format!("Fee {seq}"),
                amount: AmountSpec::FixedCents(*cents),
                timing: TimingSpec::FromBooking(0),
            })
            .collect();
        let next = i32::try_from(items.len()).unwrap() + 1;
        items.push(TemplateItem {
            sequence_order: next,
            payment_name: "Balance".to_string(),
            amount: AmountSpec::Percentage(Decimal::from(pct)),
            timing: TimingSpec::BeforeDeparture(60),
        });

        let mut resolved = ScheduleService::resolve_template(&items, &application(total)).unwrap();
        reconcile_rounding_error(&mut resolved, total);

        prop_assert_eq!(resolved.iter().map(|i| i.expected_amount_cents).sum::<i64>(), total);
    }

    #[test]
    fn prop_direct_items_sum_check(
        amounts in prop::collection::vec(0i64..1_000_000, 1..12),
        delta in -5i64..=5,
    ) {
        let items: Vec<ExpectedItemInput> = amounts
            .iter()
            .map(|cents| ExpectedItemInput {
                payment_name: "Installment".to_string(),
                expected_amount_cents: *cents,
                due_date: None,
            })
            .collect();
        let total: i64 = amounts.iter().sum::<i64>() + delta;

        prop_assert_eq!(ScheduleService::validate_items(&items, total).is_ok(), delta == 0);
    }
}
