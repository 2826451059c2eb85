//! Trip-wide payment aggregation.

use chrono::{Days, NaiveDate};

use super::types::{
    ActivityPaymentStatus, ActivityRecord, BookingStatus, BookingSummary, ItemSnapshot, TripInfo,
};
use crate::calc::{saturate_cents, sum_cents};
use crate::payments::PaymentStatus;

/// Builds the booking status report from pre-loaded activities.
pub struct BookingStatusService;

impl BookingStatusService {
    /// Aggregates every activity of a trip.
    ///
    /// `upcoming_window_days` bounds the `upcoming_count` window, which is
    /// inclusive at both ends: `[today, today + window]`.
    #[must_use]
    pub fn aggregate(
        trip: TripInfo,
        activities: &[ActivityRecord],
        today: NaiveDate,
        upcoming_window_days: u32,
    ) -> BookingStatus {
        let window_end = today
            .checked_add_days(Days::new(u64::from(upcoming_window_days)))
            .unwrap_or(NaiveDate::MAX);

        let mut summary = BookingSummary {
            total_activities: activities.len(),
            ..BookingSummary::default()
        };
        let mut rows = Vec::with_capacity(activities.len());

        for activity in activities {
            let row = Self::activity_status(activity, today);

            summary.total_expected_cents = summary
                .total_expected_cents
                .saturating_add(row.payment_total_cents);
            summary.total_paid_cents = summary
                .total_paid_cents
                .saturating_add(row.payment_paid_cents);
            summary.total_remaining_cents = summary
                .total_remaining_cents
                .saturating_add(row.payment_remaining_cents);
            if row.has_schedule {
                summary.activities_with_schedule += 1;
            }
            if row.payment_status == Some(PaymentStatus::Overdue) {
                summary.overdue_count += 1;
            }
            summary.upcoming_count += activity
                .items
                .iter()
                .filter(|item| item.status != PaymentStatus::Paid)
                .filter_map(|item| item.due_date)
                .filter(|due| *due >= today && *due <= window_end)
                .count();

            rows.push(row);
        }

        BookingStatus {
            trip,
            summary,
            activities: rows,
        }
    }

    /// Payment view of a single activity.
    #[must_use]
    pub fn activity_status(activity: &ActivityRecord, today: NaiveDate) -> ActivityPaymentStatus {
        let has_schedule = !activity.items.is_empty();

        let (payment_status, total, paid, next_due_date) = if has_schedule {
            let total = saturate_cents(sum_cents(
                activity.items.iter().map(|i| i.expected_amount_cents),
            ));
            let paid = saturate_cents(sum_cents(
                activity.items.iter().map(|i| i.paid_amount_cents),
            ));
            let next_due = activity
                .items
                .iter()
                .filter(|item| item.status != PaymentStatus::Paid)
                .filter_map(|item| item.due_date)
                .min();
            (Self::worst_status(&activity.items, today), total, paid, next_due)
        } else {
            match activity.total_price_cents {
                Some(price) if price > 0 => (Some(PaymentStatus::Pending), price, 0, None),
                _ => (None, 0, 0, None),
            }
        };

        ActivityPaymentStatus {
            activity_id: activity.activity_id,
            activity_name: activity.activity_name.clone(),
            activity_type: activity.activity_type,
            total_price_cents: activity.total_price_cents,
            currency: activity.currency.clone(),
            has_schedule,
            payment_status,
            payment_total_cents: total,
            payment_paid_cents: paid,
            payment_remaining_cents: total.saturating_sub(paid).max(0),
            next_due_date,
        }
    }

    /// Worst status across items: overdue > partial > pending > paid.
    ///
    /// A stored `pending` whose due date has passed reads as overdue, since
    /// the cache is only refreshed on transaction writes.
    #[must_use]
    pub fn worst_status(items: &[ItemSnapshot], today: NaiveDate) -> Option<PaymentStatus> {
        items
            .iter()
            .map(|item| Self::effective_status(item, today))
            .max_by_key(|status| status.severity())
    }

    fn effective_status(item: &ItemSnapshot, today: NaiveDate) -> PaymentStatus {
        match item.status {
            PaymentStatus::Pending if item.due_date.is_some_and(|due| due < today) => {
                PaymentStatus::Overdue
            }
            status => status,
        }
    }
}
