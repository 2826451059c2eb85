//! Payment transaction types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfare_shared::CurrencyCode;

use crate::schedule::ExpectedPaymentItem;

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money received from the client.
    Payment,
    /// Money returned to the client.
    Refund,
    /// Manual correction, counted like a payment.
    Adjustment,
}

impl TransactionType {
    /// Applies the direction to a non-negative amount.
    #[must_use]
    pub const fn signed(self, amount_cents: i64) -> i64 {
        match self {
            Self::Payment | Self::Adjustment => amount_cents,
            Self::Refund => amount_cents.saturating_neg(),
        }
    }
}

/// Derived status of an expected payment item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing paid, not yet due.
    Pending,
    /// Something paid, not everything.
    Partial,
    /// Fully paid.
    Paid,
    /// Nothing paid and the due date has passed.
    Overdue,
}

impl PaymentStatus {
    /// Rank used when rolling item statuses up to an activity; higher is worse.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Paid => 0,
            Self::Pending => 1,
            Self::Partial => 2,
            Self::Overdue => 3,
        }
    }
}

/// Immutable record of money moving against one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    /// Transaction ID.
    pub id: Uuid,
    /// Item the money moved against.
    pub expected_payment_item_id: Uuid,
    /// Owning agency.
    pub agency_id: Uuid,
    /// Direction.
    pub transaction_type: TransactionType,
    /// Non-negative amount; direction comes from `transaction_type`.
    pub amount_cents: i64,
    /// Must equal the activity's currency.
    pub currency: CurrencyCode,
    /// E.g. "visa", "e-transfer".
    pub payment_method: Option<String>,
    /// External reference.
    pub reference_number: Option<String>,
    /// Date the money moved.
    pub transaction_date: NaiveDate,
    /// Free-form notes.
    pub notes: Option<String>,
    /// User who recorded it.
    pub created_by: Uuid,
    /// Recording timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for recording a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionInput {
    /// Item to record against.
    pub expected_payment_item_id: Uuid,
    /// Direction.
    pub transaction_type: TransactionType,
    /// Non-negative amount.
    pub amount_cents: i64,
    /// Currency of the money moved.
    pub currency: CurrencyCode,
    /// Optional payment method.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Optional external reference.
    #[serde(default)]
    pub reference_number: Option<String>,
    /// Date the money moved.
    pub transaction_date: NaiveDate,
    /// Optional notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A signed-by-type amount fed to cache recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Movement {
    /// Direction.
    pub transaction_type: TransactionType,
    /// Non-negative amount.
    pub amount_cents: i64,
}

impl From<&PaymentTransaction> for Movement {
    fn from(tx: &PaymentTransaction) -> Self {
        Self {
            transaction_type: tx.transaction_type,
            amount_cents: tx.amount_cents,
        }
    }
}

/// Cached payment state of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPaymentState {
    /// Clamped sum of movements.
    pub paid_amount_cents: i64,
    /// Derived status.
    pub status: PaymentStatus,
}

/// A transaction write together with the item cache it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    /// Transaction created or deleted.
    pub transaction: PaymentTransaction,
    /// Item after cache sync.
    pub item: ExpectedPaymentItem,
}
