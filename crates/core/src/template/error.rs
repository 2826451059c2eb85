//! Template validation errors.
//!
//! Item-level variants carry the 1-based position of the offending item.

use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;
use wayfare_shared::AppError;

/// Errors raised while validating a template or its item set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// Template name is blank.
    #[error("Template name cannot be empty")]
    EmptyName,

    /// A template needs at least one item.
    #[error("Template must have at least one item")]
    NoItems,

    /// Item payment name is blank.
    #[error("Item {position}: payment name cannot be empty")]
    EmptyPaymentName {
        /// 1-based item position.
        position: usize,
    },

    /// Both percentage and fixed amount were given.
    #[error("Item {position}: specify either percentage or fixed_amount_cents, not both")]
    AmountSpecConflict {
        /// 1-based item position.
        position: usize,
    },

    /// Neither percentage nor fixed amount was given.
    #[error("Item {position}: either percentage or fixed_amount_cents is required")]
    AmountSpecMissing {
        /// 1-based item position.
        position: usize,
    },

    /// Both timing offsets were given.
    #[error("Item {position}: specify either days_from_booking or days_before_departure, not both")]
    TimingSpecConflict {
        /// 1-based item position.
        position: usize,
    },

    /// Neither timing offset was given.
    #[error("Item {position}: either days_from_booking or days_before_departure is required")]
    TimingSpecMissing {
        /// 1-based item position.
        position: usize,
    },

    /// Percentage outside 0..=100.
    #[error("Item {position}: percentage {percentage} must be between 0 and 100")]
    PercentageOutOfRange {
        /// 1-based item position.
        position: usize,
        /// Supplied percentage.
        percentage: Decimal,
    },

    /// Percentage has more than two decimal places.
    #[error("Item {position}: percentage {percentage} has more than two decimal places")]
    PercentagePrecision {
        /// 1-based item position.
        position: usize,
        /// Supplied percentage.
        percentage: Decimal,
    },

    /// Fixed amount is zero or negative.
    #[error("Item {position}: fixed amount must be greater than zero, got {amount_cents}")]
    NonPositiveFixedAmount {
        /// 1-based item position.
        position: usize,
        /// Supplied amount.
        amount_cents: i64,
    },

    /// Day offset is negative.
    #[error("Item {position}: day offset must be zero or more, got {days}")]
    NegativeDayOffset {
        /// 1-based item position.
        position: usize,
        /// Supplied offset.
        days: i32,
    },

    /// Two items share a sequence order.
    #[error("Duplicate sequence order {sequence_order}")]
    DuplicateSequence {
        /// Repeated sequence order.
        sequence_order: i32,
    },

    /// All-percentage item set does not add up to 100.
    #[error("Percentages must sum to 100, got {total}")]
    PercentageSumMismatch {
        /// Actual sum.
        total: Decimal,
    },
}

impl TemplateError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "INVALID_TEMPLATE_NAME",
            Self::NoItems => "TEMPLATE_HAS_NO_ITEMS",
            Self::EmptyPaymentName { .. } => "INVALID_PAYMENT_NAME",
            Self::AmountSpecConflict { .. } | Self::AmountSpecMissing { .. } => {
                "INVALID_AMOUNT_SPEC"
            }
            Self::TimingSpecConflict { .. } | Self::TimingSpecMissing { .. } => {
                "INVALID_TIMING_SPEC"
            }
            Self::PercentageOutOfRange { .. } | Self::PercentagePrecision { .. } => {
                "INVALID_PERCENTAGE"
            }
            Self::NonPositiveFixedAmount { .. } => "INVALID_FIXED_AMOUNT",
            Self::NegativeDayOffset { .. } => "INVALID_DAY_OFFSET",
            Self::DuplicateSequence { .. } => "DUPLICATE_SEQUENCE_ORDER",
            Self::PercentageSumMismatch { .. } => "PERCENTAGE_SUM_MISMATCH",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }

    /// 1-based position of the offending item, if item-specific.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::EmptyPaymentName { position }
            | Self::AmountSpecConflict { position }
            | Self::AmountSpecMissing { position }
            | Self::TimingSpecConflict { position }
            | Self::TimingSpecMissing { position }
            | Self::PercentageOutOfRange { position, .. }
            | Self::PercentagePrecision { position, .. }
            | Self::NonPositiveFixedAmount { position, .. }
            | Self::NegativeDayOffset { position, .. } => Some(*position),
            Self::EmptyName
            | Self::NoItems
            | Self::DuplicateSequence { .. }
            | Self::PercentageSumMismatch { .. } => None,
        }
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        let details = match &err {
            TemplateError::PercentageSumMismatch { total } => json!({ "total": total }),
            TemplateError::DuplicateSequence { sequence_order } => {
                json!({ "sequence_order": sequence_order })
            }
            other => other
                .position()
                .map_or(serde_json::Value::Null, |position| json!({ "position": position })),
        };
        Self::Validation {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_errors_name_position() {
        let err = TemplateError::AmountSpecConflict { position: 2 };
        assert_eq!(err.error_code(), "INVALID_AMOUNT_SPEC");
        assert_eq!(err.http_status_code(), 400);
        assert!(err.to_string().starts_with("Item 2:"));
    }

    #[test]
    fn test_into_app_error_carries_position() {
        let app: AppError = TemplateError::TimingSpecMissing { position: 3 }.into();
        let body = app.to_body();
        assert_eq!(body.code, "INVALID_TIMING_SPEC");
        assert_eq!(body.details["position"], 3);
    }

    #[test]
    fn test_name_error_has_no_details() {
        let app: AppError = TemplateError::EmptyName.into();
        assert_eq!(app.status_code(), 400);
        assert!(app.to_body().details.is_null());
    }
}
