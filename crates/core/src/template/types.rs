//! Payment schedule template types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calc::OffsetDirection;
use crate::schedule::ScheduleType;

/// How much an item charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AmountSpec {
    /// Share of the booking total, 0..=100 with at most two decimal places.
    Percentage(Decimal),
    /// Fixed amount in cents, always positive.
    FixedCents(i64),
}

impl AmountSpec {
    /// Returns the percentage, if this is a percentage item.
    #[must_use]
    pub const fn percentage(&self) -> Option<Decimal> {
        match self {
            Self::Percentage(pct) => Some(*pct),
            Self::FixedCents(_) => None,
        }
    }

    /// Returns the fixed amount, if this is a fixed item.
    #[must_use]
    pub const fn fixed_cents(&self) -> Option<i64> {
        match self {
            Self::FixedCents(cents) => Some(*cents),
            Self::Percentage(_) => None,
        }
    }

    /// Percentage in hundredths of a percent (`12.5%` -> `1250`).
    #[must_use]
    pub fn percentage_basis_points(&self) -> Option<i32> {
        self.percentage()
            .and_then(|pct| (pct * Decimal::ONE_HUNDRED).trunc().to_i32())
    }

    /// Builds a percentage spec from hundredths of a percent.
    #[must_use]
    pub fn from_basis_points(basis_points: i32) -> Self {
        Self::Percentage(Decimal::new(i64::from(basis_points), 2))
    }
}

/// When an item falls due, relative to the booking or departure date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "days")]
pub enum TimingSpec {
    /// Days after the booking date.
    FromBooking(u32),
    /// Days before departure.
    BeforeDeparture(u32),
}

impl TimingSpec {
    /// Offset in days and the direction it moves from its anchor.
    #[must_use]
    pub const fn offset(&self) -> (u32, OffsetDirection) {
        match self {
            Self::FromBooking(days) => (*days, OffsetDirection::After),
            Self::BeforeDeparture(days) => (*days, OffsetDirection::Before),
        }
    }

    /// Returns the booking offset, if any.
    #[must_use]
    pub const fn days_from_booking(&self) -> Option<u32> {
        match self {
            Self::FromBooking(days) => Some(*days),
            Self::BeforeDeparture(_) => None,
        }
    }

    /// Returns the departure offset, if any.
    #[must_use]
    pub const fn days_before_departure(&self) -> Option<u32> {
        match self {
            Self::BeforeDeparture(days) => Some(*days),
            Self::FromBooking(_) => None,
        }
    }
}

/// A validated template item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateItem {
    /// Position within the template.
    pub sequence_order: i32,
    /// Display name, e.g. "Deposit".
    pub payment_name: String,
    /// Amount rule.
    pub amount: AmountSpec,
    /// Timing rule.
    pub timing: TimingSpec,
}

/// Item as submitted by a caller, before shape validation.
///
/// Exactly one field of each pair must be set; see
/// [`TemplateService::validate_items`](super::TemplateService::validate_items).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateItemPayload {
    /// Display name.
    pub payment_name: String,
    /// Explicit position; defaults to the 1-based list position.
    #[serde(default)]
    pub sequence_order: Option<i32>,
    /// Share of the total.
    #[serde(default)]
    pub percentage: Option<Decimal>,
    /// Fixed amount in cents.
    #[serde(default)]
    pub fixed_amount_cents: Option<i64>,
    /// Days after booking.
    #[serde(default)]
    pub days_from_booking: Option<i32>,
    /// Days before departure.
    #[serde(default)]
    pub days_before_departure: Option<i32>,
}

/// A stored template with its items ordered by sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentScheduleTemplate {
    /// Template ID.
    pub id: Uuid,
    /// Owning agency.
    pub agency_id: Uuid,
    /// Name, unique in practice but not enforced.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Kind of schedule the template produces.
    pub schedule_type: ScheduleType,
    /// At most one active default per agency.
    pub is_default: bool,
    /// False once soft-deleted.
    pub is_active: bool,
    /// Incremented each time the item list is replaced.
    pub version: i32,
    /// User who created the template.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Items ordered by `sequence_order`.
    pub items: Vec<TemplateItem>,
}

/// Input for creating a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTemplateInput {
    /// Template name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Kind of schedule produced.
    pub schedule_type: ScheduleType,
    /// Make this the agency default.
    #[serde(default)]
    pub is_default: bool,
    /// Item blueprints.
    pub items: Vec<TemplateItemPayload>,
}

/// Partial update for a template. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTemplateInput {
    /// New name.
    pub name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New schedule type.
    pub schedule_type: Option<ScheduleType>,
    /// Set or clear the default flag.
    pub is_default: Option<bool>,
    /// Reactivate or deactivate.
    pub is_active: Option<bool>,
    /// Replacement item list; bumps the version.
    pub items: Option<Vec<TemplateItemPayload>>,
}

impl UpdateTemplateInput {
    /// True when only metadata changes.
    #[must_use]
    pub const fn is_metadata_only(&self) -> bool {
        self.items.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_basis_points_round_trip() {
        let spec = AmountSpec::Percentage(dec!(12.5));
        assert_eq!(spec.percentage_basis_points(), Some(1250));
        assert_eq!(AmountSpec::from_basis_points(1250), spec);
        assert_eq!(AmountSpec::FixedCents(500).percentage_basis_points(), None);
    }

    #[test]
    fn test_timing_offsets() {
        assert_eq!(
            TimingSpec::FromBooking(7).offset(),
            (7, OffsetDirection::After)
        );
        assert_eq!(
            TimingSpec::BeforeDeparture(60).offset(),
            (60, OffsetDirection::Before)
        );
    }

    #[test]
    fn test_payload_fields_default_to_none() {
        let payload: TemplateItemPayload = serde_json::from_str(
            r#"{"payment_name":"Deposit","percentage":"25","days_from_booking":0}"#,
        )
        .unwrap();
        assert_eq!(payload.percentage, Some(dec!(25)));
        assert_eq!(payload.days_from_booking, Some(0));
        assert_eq!(payload.fixed_amount_cents, None);
    }
}
