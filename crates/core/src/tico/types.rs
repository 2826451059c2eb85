//! Compliance report types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One resolved payment line as seen by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLine {
    /// Position within the schedule.
    pub sequence_order: i32,
    /// Amount owed, in cents.
    pub expected_amount_cents: i64,
    /// Absolute due date, if any.
    pub due_date: Option<NaiveDate>,
}

/// Whether an issue blocks persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks persistence.
    Error,
    /// Reported, never blocks.
    Warning,
}

/// Machine-readable rule identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicoIssueCode {
    /// Items do not add up to the total.
    SumMismatch,
    /// Final payment due fewer than the minimum days before departure.
    FinalPaymentTooLate,
    /// A payment is below the minimum amount.
    PaymentTooSmall,
    /// More items than allowed.
    TooManyInstallments,
    /// The first payment is a large share of the total.
    HighDeposit,
    /// A due date already lies in the past.
    PastDueDate,
}

impl TicoIssueCode {
    /// Returns the code as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SumMismatch => "SUM_MISMATCH",
            Self::FinalPaymentTooLate => "FINAL_PAYMENT_TOO_LATE",
            Self::PaymentTooSmall => "PAYMENT_TOO_SMALL",
            Self::TooManyInstallments => "TOO_MANY_INSTALLMENTS",
            Self::HighDeposit => "HIGH_DEPOSIT",
            Self::PastDueDate => "PAST_DUE_DATE",
        }
    }
}

/// Rule-specific numeric context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssueDetails {
    /// Context for `SUM_MISMATCH`.
    SumMismatch {
        /// Required total.
        expected_cents: i64,
        /// Actual sum of items.
        actual_cents: i64,
        /// `actual - expected`.
        difference_cents: i64,
    },
    /// Context for `FINAL_PAYMENT_TOO_LATE`.
    FinalPaymentTooLate {
        /// Due date of the final item.
        due_date: NaiveDate,
        /// Trip departure date.
        departure_date: NaiveDate,
        /// Whole days between the two.
        days_before_departure: i64,
        /// Minimum allowed.
        required_days: i64,
    },
    /// Context for `PAYMENT_TOO_SMALL`.
    PaymentTooSmall {
        /// Offending item.
        sequence_order: i32,
        /// Its amount.
        amount_cents: i64,
        /// Minimum allowed.
        minimum_cents: i64,
    },
    /// Context for `TOO_MANY_INSTALLMENTS`.
    TooManyInstallments {
        /// Number of items supplied.
        count: usize,
        /// Maximum allowed.
        maximum: usize,
    },
    /// Context for `HIGH_DEPOSIT`.
    HighDeposit {
        /// First payment amount.
        deposit_cents: i64,
        /// Schedule total.
        total_cents: i64,
        /// Deposit share of the total, two decimal places.
        deposit_percent: Decimal,
        /// Warning threshold.
        threshold_percent: i64,
    },
    /// Context for `PAST_DUE_DATE`.
    PastDueDate {
        /// Offending item.
        sequence_order: i32,
        /// Its due date.
        due_date: NaiveDate,
        /// Reference date it was compared against.
        as_of: NaiveDate,
    },
}

/// A single compliance finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicoIssue {
    /// Rule identifier.
    pub code: TicoIssueCode,
    /// Error or warning.
    pub severity: Severity,
    /// Human-readable explanation.
    pub message: String,
    /// Rule-specific context.
    pub details: IssueDetails,
}

/// Outcome of validating a schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicoReport {
    /// True when `errors` is empty.
    pub is_valid: bool,
    /// Blocking findings.
    pub errors: Vec<TicoIssue>,
    /// Non-blocking findings.
    pub warnings: Vec<TicoIssue>,
}

impl TicoReport {
    /// Returns true if any error carries `code`.
    #[must_use]
    pub fn has_error(&self, code: TicoIssueCode) -> bool {
        self.errors.iter().any(|issue| issue.code == code)
    }

    /// Returns true if any warning carries `code`.
    #[must_use]
    pub fn has_warning(&self, code: TicoIssueCode) -> bool {
        self.warnings.iter().any(|issue| issue.code == code)
    }
}
