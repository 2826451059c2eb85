//! Booking status report types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfare_shared::CurrencyCode;

use crate::payments::PaymentStatus;
use crate::schedule::ExpectedPaymentItem;

/// Kind of itinerary activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Air travel.
    Flight,
    /// Hotels and other accommodation.
    Lodging,
    /// Restaurants.
    Dining,
    /// Cruise legs.
    Cruise,
    /// Bundled packages.
    Package,
    /// Ground transfers, rail, car hire.
    Transportation,
    /// Tours and excursions.
    Tour,
    /// Anything else.
    Other,
}

/// Trip header for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripInfo {
    /// Trip ID.
    pub id: Uuid,
    /// Trip name.
    pub name: String,
    /// Departure date, if scheduled.
    pub departure_date: Option<NaiveDate>,
}

/// Payment-relevant view of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSnapshot {
    /// Amount owed.
    pub expected_amount_cents: i64,
    /// Cached paid amount.
    pub paid_amount_cents: i64,
    /// Cached status.
    pub status: PaymentStatus,
    /// Due date.
    pub due_date: Option<NaiveDate>,
}

impl From<&ExpectedPaymentItem> for ItemSnapshot {
    fn from(item: &ExpectedPaymentItem) -> Self {
        Self {
            expected_amount_cents: item.expected_amount_cents,
            paid_amount_cents: item.paid_amount_cents,
            status: item.status,
            due_date: item.due_date,
        }
    }
}

/// One activity with its pricing and schedule items, as loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    /// Activity ID.
    pub activity_id: Uuid,
    /// Activity name.
    pub activity_name: String,
    /// Activity kind.
    pub activity_type: ActivityType,
    /// Priced total, if the activity has pricing.
    pub total_price_cents: Option<i64>,
    /// Pricing currency.
    pub currency: Option<CurrencyCode>,
    /// Schedule items; empty when unscheduled.
    pub items: Vec<ItemSnapshot>,
}

/// Per-activity payment view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPaymentStatus {
    /// Activity ID.
    pub activity_id: Uuid,
    /// Activity name.
    pub activity_name: String,
    /// Activity kind.
    pub activity_type: ActivityType,
    /// Priced total.
    pub total_price_cents: Option<i64>,
    /// Pricing currency.
    pub currency: Option<CurrencyCode>,
    /// Whether a schedule with items exists.
    pub has_schedule: bool,
    /// Worst item status; `None` when nothing is owed.
    pub payment_status: Option<PaymentStatus>,
    /// Total expected.
    pub payment_total_cents: i64,
    /// Total paid.
    pub payment_paid_cents: i64,
    /// Outstanding, never negative.
    pub payment_remaining_cents: i64,
    /// Earliest due date among unpaid items.
    pub next_due_date: Option<NaiveDate>,
}

/// Trip-wide rollup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    /// Number of activities on the trip.
    pub total_activities: usize,
    /// Activities with a schedule.
    pub activities_with_schedule: usize,
    /// Sum of expected amounts.
    pub total_expected_cents: i64,
    /// Sum of paid amounts.
    pub total_paid_cents: i64,
    /// Sum of outstanding amounts.
    pub total_remaining_cents: i64,
    /// Activities whose status is overdue.
    pub overdue_count: usize,
    /// Unpaid items due within the upcoming window.
    pub upcoming_count: usize,
}

/// The booking status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingStatus {
    /// Trip header.
    pub trip: TripInfo,
    /// Rollup.
    pub summary: BookingSummary,
    /// Per-activity rows in itinerary order.
    pub activities: Vec<ActivityPaymentStatus>,
}
