//! Payment schedule data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfare_shared::CurrencyCode;

use crate::calc::SequencedAmount;
use crate::payments::PaymentStatus;
use crate::tico::{PaymentLine, TicoIssue, TicoReport};

/// Kind of payment schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    /// Single payment of the full amount.
    Full,
    /// Deposit followed by a balance.
    Deposit,
    /// Several installments.
    Installments,
    /// Held against a credit-card guarantee.
    Guarantee,
}

/// Discriminant of a [`DepositSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositType {
    /// Share of the total.
    Percentage,
    /// Fixed cents.
    FixedAmount,
}

/// Deposit rule for `deposit` schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "deposit_type", content = "value")]
pub enum DepositSpec {
    /// Percentage of the activity total, 0..=100.
    Percentage(Decimal),
    /// Fixed cents, 0..=total.
    FixedAmount(i64),
}

impl DepositSpec {
    /// Returns the discriminant.
    #[must_use]
    pub const fn deposit_type(&self) -> DepositType {
        match self {
            Self::Percentage(_) => DepositType::Percentage,
            Self::FixedAmount(_) => DepositType::FixedAmount,
        }
    }

    /// Percentage in hundredths of a percent, rounded to two decimal places.
    #[must_use]
    pub fn percentage_basis_points(&self) -> Option<i32> {
        match self {
            Self::Percentage(pct) => (pct
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                * Decimal::ONE_HUNDRED)
                .to_i32(),
            Self::FixedAmount(_) => None,
        }
    }

    /// Builds a percentage deposit from hundredths of a percent.
    #[must_use]
    pub fn from_basis_points(basis_points: i32) -> Self {
        Self::Percentage(Decimal::new(i64::from(basis_points), 2))
    }
}

/// The collaborator record a schedule hangs off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedActivity {
    /// Activity pricing ID.
    pub id: Uuid,
    /// Owning agency.
    pub agency_id: Uuid,
    /// Must be set before any schedule can be created.
    pub total_price_cents: Option<i64>,
    /// Currency all transactions must use.
    pub currency: CurrencyCode,
}

/// Inline expected item supplied on create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedItemInput {
    /// Display name.
    pub payment_name: String,
    /// Amount owed, in cents.
    pub expected_amount_cents: i64,
    /// Optional due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Credit-card guarantee details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuaranteeInput {
    /// Name on the card.
    pub card_holder_name: String,
    /// Last four digits of the card number.
    pub last_four: String,
    /// Processor authorization code.
    #[serde(default)]
    pub authorization_code: Option<String>,
    /// Date the authorization was obtained.
    #[serde(default)]
    pub authorization_date: Option<NaiveDate>,
    /// Authorized amount, in cents.
    #[serde(default)]
    pub authorization_amount_cents: Option<i64>,
}

/// Input for creating a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateScheduleInput {
    /// Activity pricing the schedule belongs to.
    pub activity_pricing_id: Uuid,
    /// Kind of schedule.
    pub schedule_type: ScheduleType,
    /// Whether partial payments are accepted.
    #[serde(default)]
    pub allow_partial_payments: bool,
    /// Required for `deposit` schedules.
    #[serde(default)]
    pub deposit: Option<DepositSpec>,
    /// Optional inline items; must sum to the activity total.
    #[serde(default)]
    pub items: Option<Vec<ExpectedItemInput>>,
    /// Required for `guarantee` schedules.
    #[serde(default)]
    pub guarantee: Option<GuaranteeInput>,
}

/// Input for updating a schedule. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateScheduleInput {
    /// New schedule type.
    pub schedule_type: Option<ScheduleType>,
    /// New partial-payment flag.
    pub allow_partial_payments: Option<bool>,
    /// New deposit rule.
    pub deposit: Option<DepositSpec>,
    /// Replacement item set; existing items and their payment state are dropped.
    pub items: Option<Vec<ExpectedItemInput>>,
    /// Guarantee to upsert.
    pub guarantee: Option<GuaranteeInput>,
}

/// Patch for a single expected item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    /// New display name.
    pub payment_name: Option<String>,
    /// New due date; `Some(None)` clears it.
    pub due_date: Option<Option<NaiveDate>>,
    /// New amount; the schedule must still sum to the activity total.
    pub expected_amount_cents: Option<i64>,
}

/// Settings a validated create or update resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    /// Kind of schedule.
    pub schedule_type: ScheduleType,
    /// Whether partial payments are accepted.
    pub allow_partial_payments: bool,
    /// Deposit rule, only kept for `deposit` schedules.
    pub deposit: Option<DepositSpec>,
}

/// Root of a concrete schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentScheduleConfig {
    /// Config ID.
    pub id: Uuid,
    /// Activity pricing (one config per pricing).
    pub activity_pricing_id: Uuid,
    /// Owning agency.
    pub agency_id: Uuid,
    /// Kind of schedule.
    pub schedule_type: ScheduleType,
    /// Whether partial payments are accepted.
    pub allow_partial_payments: bool,
    /// Deposit rule for `deposit` schedules.
    pub deposit: Option<DepositSpec>,
    /// Template last applied, if any.
    pub template_id: Option<Uuid>,
    /// Version of that template at apply time.
    pub template_version: Option<i32>,
    /// User who created the schedule.
    pub created_by: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// One installment of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedPaymentItem {
    /// Item ID.
    pub id: Uuid,
    /// Parent config.
    pub payment_schedule_config_id: Uuid,
    /// Owning agency.
    pub agency_id: Uuid,
    /// Display name.
    pub payment_name: String,
    /// Amount owed, in cents.
    pub expected_amount_cents: i64,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Position within the schedule.
    pub sequence_order: i32,
    /// Derived payment status.
    pub status: PaymentStatus,
    /// Cached sum of transactions, never negative.
    pub paid_amount_cents: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Stored credit-card guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCardGuarantee {
    /// Guarantee ID.
    pub id: Uuid,
    /// Parent config.
    pub payment_schedule_config_id: Uuid,
    /// Name on the card.
    pub card_holder_name: String,
    /// Last four digits.
    pub last_four: String,
    /// Processor authorization code.
    pub authorization_code: Option<String>,
    /// Date the authorization was obtained.
    pub authorization_date: Option<NaiveDate>,
    /// Authorized amount, in cents.
    pub authorization_amount_cents: Option<i64>,
}

/// A config together with its items and guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    /// Schedule root.
    pub config: PaymentScheduleConfig,
    /// Items ordered by sequence.
    pub items: Vec<ExpectedPaymentItem>,
    /// Guarantee, for `guarantee` schedules.
    pub guarantee: Option<CreditCardGuarantee>,
}

/// Input for applying a template to an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyTemplateInput {
    /// Template to apply.
    pub template_id: Uuid,
    /// Anchor for `days_from_booking` items; defaults to today.
    #[serde(default)]
    pub booking_date: Option<NaiveDate>,
    /// Anchor for `days_before_departure` items.
    pub departure_date: NaiveDate,
    /// Total the template is resolved against.
    pub total_amount_cents: i64,
}

/// Resolved anchors for template resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateApplication {
    /// Total to split.
    pub total_amount_cents: i64,
    /// Anchor for booking offsets.
    pub booking_date: NaiveDate,
    /// Anchor for departure offsets.
    pub departure_date: NaiveDate,
}

impl TemplateApplication {
    /// Anchors for `input`, defaulting the booking date to `today`.
    #[must_use]
    pub fn new(input: &ApplyTemplateInput, today: NaiveDate) -> Self {
        Self {
            total_amount_cents: input.total_amount_cents,
            booking_date: input.booking_date.unwrap_or(today),
            departure_date: input.departure_date,
        }
    }
}

/// A template item resolved to absolute cents and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedItem {
    /// Position within the schedule.
    pub sequence_order: i32,
    /// Display name.
    pub payment_name: String,
    /// Amount owed, in cents.
    pub expected_amount_cents: i64,
    /// Absolute due date.
    pub due_date: NaiveDate,
}

impl ResolvedItem {
    /// View of this item for the compliance validator.
    #[must_use]
    pub fn as_payment_line(&self) -> PaymentLine {
        PaymentLine {
            sequence_order: self.sequence_order,
            expected_amount_cents: self.expected_amount_cents,
            due_date: Some(self.due_date),
        }
    }
}

impl SequencedAmount for ResolvedItem {
    fn sequence_order(&self) -> i32 {
        self.sequence_order
    }

    fn amount_cents(&self) -> i64 {
        self.expected_amount_cents
    }

    fn amount_cents_mut(&mut self) -> &mut i64 {
        &mut self.expected_amount_cents
    }
}

/// Outcome of resolving and validating a template against an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePlan {
    /// Items to persist, ordered by sequence.
    pub items: Vec<ResolvedItem>,
    /// Settings for the config row.
    pub settings: ScheduleSettings,
    /// Compliance report; always valid here, may carry warnings.
    pub report: TicoReport,
}

/// Result of a successful template application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedSchedule {
    /// Persisted schedule.
    pub schedule: PaymentSchedule,
    /// Non-blocking compliance findings.
    pub warnings: Vec<TicoIssue>,
}
