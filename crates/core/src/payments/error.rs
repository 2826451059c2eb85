//! Transaction ledger errors.

use serde_json::json;
use thiserror::Error;
use uuid::Uuid;
use wayfare_shared::AppError;

/// Errors raised while validating a transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Amounts are non-negative; direction comes from the type.
    #[error("Transaction amount cannot be negative, got {0}")]
    NegativeAmount(i64),

    /// Transaction currency differs from the activity's.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        /// Activity currency.
        expected: String,
        /// Transaction currency.
        got: String,
    },

    /// The item's config or activity pricing could not be resolved.
    #[error("Cannot resolve agency for payment item {0}")]
    AgencyUnknown(Uuid),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::AgencyUnknown(_) => "AGENCY_UNKNOWN",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let details = match &err {
            LedgerError::NegativeAmount(amount) => json!({ "amount_cents": amount }),
            LedgerError::CurrencyMismatch { expected, got } => {
                json!({ "expected": expected, "got": got })
            }
            LedgerError::AgencyUnknown(item_id) => json!({ "item_id": item_id }),
        };
        Self::Validation {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details,
        }
    }
}
