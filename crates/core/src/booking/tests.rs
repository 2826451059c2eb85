//! Unit tests for booking status aggregation.

use chrono::NaiveDate;
use rstest::rstest;
use uuid::Uuid;

use super::service::BookingStatusService;
use super::types::{ActivityRecord, ActivityType, ItemSnapshot, TripInfo};
use crate::payments::PaymentStatus;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2025, 3, 1)
}

fn trip() -> TripInfo {
    TripInfo {
        id: Uuid::new_v4(),
        name: "Lisbon".to_string(),
        departure_date: Some(date(2025, 6, 1)),
    }
}

fn snapshot(
    expected: i64,
    paid: i64,
    status: PaymentStatus,
    due: Option<NaiveDate>,
) -> ItemSnapshot {
    ItemSnapshot {
        expected_amount_cents: expected,
        paid_amount_cents: paid,
        status,
        due_date: due,
    }
}

fn activity(name: &str, price: Option<i64>, items: Vec<ItemSnapshot>) -> ActivityRecord {
    ActivityRecord {
        activity_id: Uuid::new_v4(),
        activity_name: name.to_string(),
        activity_type: ActivityType::Lodging,
        total_price_cents: price,
        currency: price.map(|_| "CAD".parse().unwrap()),
        items,
    }
}

#[test]
fn test_unscheduled_priced_activity_is_pending() {
    let row = BookingStatusService::activity_status(&activity("Hotel", Some(50_000), vec![]), today());

    assert!(!row.has_schedule);
    assert_eq!(row.payment_status, Some(PaymentStatus::Pending));
    assert_eq!(row.payment_total_cents, 50_000);
    assert_eq!(row.payment_paid_cents, 0);
    assert_eq!(row.payment_remaining_cents, 50_000);
}

#[rstest]
#[case(Some(0))]
#[case(None)]
fn test_unscheduled_free_activity_has_no_status(#[case] price: Option<i64>) {
    let row = BookingStatusService::activity_status(&activity("Walk", price, vec![]), today());

    assert_eq!(row.payment_status, None);
    assert_eq!(row.payment_total_cents, 0);
    assert_eq!(row.payment_remaining_cents, 0);
}

#[test]
fn test_paid_and_overdue_is_overdue() {
    let items = vec![
        snapshot(5_000, 5_000, PaymentStatus::Paid, Some(date(2025, 1, 1))),
        snapshot(5_000, 0, PaymentStatus::Overdue, Some(date(2025, 2, 1))),
    ];
    let row = BookingStatusService::activity_status(&activity("Cruise", Some(10_000), items), today());

    assert!(row.has_schedule);
    assert_eq!(row.payment_status, Some(PaymentStatus::Overdue));
    assert_eq!(row.payment_paid_cents, 5_000);
    assert_eq!(row.payment_remaining_cents, 5_000);
    assert_eq!(row.next_due_date, Some(date(2025, 2, 1)));
}

#[rstest]
#[case(vec![PaymentStatus::Paid, PaymentStatus::Paid], PaymentStatus::Paid)]
#[case(vec![PaymentStatus::Paid, PaymentStatus::Pending], PaymentStatus::Pending)]
#[case(vec![PaymentStatus::Pending, PaymentStatus::Partial], PaymentStatus::Partial)]
#[case(vec![PaymentStatus::Partial, PaymentStatus::Overdue], PaymentStatus::Overdue)]
fn test_worst_status_priority(#[case] statuses: Vec<PaymentStatus>, #[case] worst: PaymentStatus) {
    let items: Vec<_> = statuses
        .into_iter()
        .map(|status| snapshot(1_000, 0, status, None))
        .collect();
    assert_eq!(BookingStatusService::worst_status(&items, today()), Some(worst));
}

#[test]
fn test_stale_pending_reads_as_overdue() {
    let items = vec![snapshot(1_000, 0, PaymentStatus::Pending, Some(date(2025, 2, 28)))];
    assert_eq!(
        BookingStatusService::worst_status(&items, today()),
        Some(PaymentStatus::Overdue)
    );
}

#[test]
fn test_overpaid_item_never_negative_remaining() {
    let items = vec![snapshot(1_000, 1_500, PaymentStatus::Paid, None)];
    let row = BookingStatusService::activity_status(&activity("Dinner", Some(1_000), items), today());
    assert_eq!(row.payment_remaining_cents, 0);
    assert_eq!(row.next_due_date, None);
}

#[test]
fn test_huge_amounts_saturate() {
    let activities = vec![
        activity(
            "Charter",
            Some(i64::MAX),
            vec![
                snapshot(i64::MAX, i64::MAX, PaymentStatus::Paid, None),
                snapshot(1, 0, PaymentStatus::Pending, None),
            ],
        ),
        activity("Yacht", Some(i64::MAX), vec![]),
    ];

    let status = BookingStatusService::aggregate(trip(), &activities, today(), 7);

    let charter = &status.activities[0];
    assert_eq!(charter.payment_total_cents, i64::MAX);
    assert_eq!(charter.payment_paid_cents, i64::MAX);
    assert_eq!(charter.payment_remaining_cents, 0);
    assert_eq!(status.summary.total_expected_cents, i64::MAX);
    assert_eq!(status.summary.total_remaining_cents, i64::MAX);
}

#[test]
fn test_trip_summary() {
    let activities = vec![
        activity(
            "Flight",
            Some(100_000),
            vec![
                snapshot(30_000, 30_000, PaymentStatus::Paid, Some(date(2025, 1, 15))),
                snapshot(70_000, 0, PaymentStatus::Pending, Some(date(2025, 3, 5))),
            ],
        ),
        activity(
            "Hotel",
            Some(50_000),
            vec![snapshot(50_000, 0, PaymentStatus::Overdue, Some(date(2025, 2, 1)))],
        ),
        activity("Tour", Some(20_000), vec![]),
        activity("Museum", Some(0), vec![]),
        activity(
            "Cruise",
            Some(80_000),
            vec![snapshot(80_000, 10_000, PaymentStatus::Partial, Some(date(2025, 3, 8)))],
        ),
    ];

    let status = BookingStatusService::aggregate(trip(), &activities, today(), 7);
    let summary = status.summary;

    assert_eq!(summary.total_activities, 5);
    assert_eq!(summary.activities_with_schedule, 3);
    assert_eq!(summary.total_expected_cents, 250_000);
    assert_eq!(summary.total_paid_cents, 40_000);
    assert_eq!(summary.total_remaining_cents, 210_000);
    assert_eq!(summary.overdue_count, 1);
    // 2025-03-05 and 2025-03-08 fall inside [03-01, 03-08].
    assert_eq!(summary.upcoming_count, 2);

    assert_eq!(status.activities.len(), 5);
    assert_eq!(status.activities[0].activity_name, "Flight");
    assert_eq!(status.activities[3].payment_status, None);
}

#[test]
fn test_upcoming_window_bounds() {
    let items = vec![
        snapshot(1_000, 0, PaymentStatus::Pending, Some(today())),
        snapshot(1_000, 0, PaymentStatus::Pending, Some(date(2025, 3, 8))),
        snapshot(1_000, 0, PaymentStatus::Pending, Some(date(2025, 3, 9))),
        snapshot(1_000, 1_000, PaymentStatus::Paid, Some(date(2025, 3, 2))),
    ];
    let status = BookingStatusService::aggregate(
        trip(),
        &[activity("Rail", Some(4_000), items)],
        today(),
        7,
    );
    assert_eq!(status.summary.upcoming_count, 2);
}

#[test]
fn test_empty_trip() {
    let status = BookingStatusService::aggregate(trip(), &[], today(), 7);
    assert_eq!(status.summary.total_activities, 0);
    assert_eq!(status.summary.total_expected_cents, 0);
    assert!(status.activities.is_empty());
}
