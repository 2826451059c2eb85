//! Schedule error types.

use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;
use wayfare_shared::AppError;

use crate::tico::TicoReport;

/// Errors raised while validating or planning a schedule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// Activity pricing has no total yet.
    #[error("Activity pricing {0} has no total price")]
    MissingTotalPrice(Uuid),

    /// A `deposit` schedule needs a deposit rule.
    #[error("Deposit schedules require a deposit type and value")]
    DepositRequired,

    /// Deposit percentage outside 0..=100.
    #[error("Deposit percentage {0} must be between 0 and 100")]
    DepositPercentageOutOfRange(Decimal),

    /// Fixed deposit outside 0..=total.
    #[error("Deposit amount {amount_cents} must be between 0 and {total_cents}")]
    DepositAmountOutOfRange {
        /// Supplied deposit.
        amount_cents: i64,
        /// Activity total.
        total_cents: i64,
    },

    /// A `guarantee` schedule needs guarantee data.
    #[error("Guarantee schedules require credit card guarantee details")]
    GuaranteeRequired,

    /// Guarantee data is malformed.
    #[error("Invalid guarantee: {0}")]
    InvalidGuarantee(String),

    /// Item amount is negative.
    #[error("Item {position}: amount cannot be negative, got {amount_cents}")]
    NegativeItemAmount {
        /// 1-based item position.
        position: usize,
        /// Supplied amount.
        amount_cents: i64,
    },

    /// Item payment name is blank.
    #[error("Item {position}: payment name cannot be empty")]
    EmptyPaymentName {
        /// 1-based item position.
        position: usize,
    },

    /// Items do not add up to the activity total.
    #[error(
        "Payment items total {actual_cents} cents but the activity total is {expected_cents} cents"
    )]
    SumMismatch {
        /// Activity total.
        expected_cents: i64,
        /// Sum of items.
        actual_cents: i64,
        /// `actual - expected`.
        difference_cents: i64,
    },

    /// Template has no items to apply.
    #[error("Template {0} has no items")]
    EmptyTemplate(Uuid),

    /// Requested total differs from the activity's price.
    #[error("Total {provided_cents} does not match the activity total {expected_cents}")]
    TemplateTotalMismatch {
        /// Activity total.
        expected_cents: i64,
        /// Total supplied with the template application.
        provided_cents: i64,
    },

    /// A resolved due date falls outside the calendar.
    #[error("Item {sequence_order}: resolved due date is out of range")]
    DateOutOfRange {
        /// Sequence order of the offending item.
        sequence_order: i32,
    },

    /// Resolved schedule violates compliance rules.
    #[error("Schedule failed TICO validation with {} error(s)", report.errors.len())]
    TicoValidationFailed {
        /// Every error and warning found.
        report: TicoReport,
    },
}

impl ScheduleError {
    /// Returns the error code for API responses.
    ///
    /// TICO failures report the code of their first blocking issue.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingTotalPrice(_) => "MISSING_TOTAL_PRICE",
            Self::DepositRequired => "DEPOSIT_REQUIRED",
            Self::DepositPercentageOutOfRange(_) => "INVALID_DEPOSIT_PERCENTAGE",
            Self::DepositAmountOutOfRange { .. } => "INVALID_DEPOSIT_AMOUNT",
            Self::GuaranteeRequired => "GUARANTEE_REQUIRED",
            Self::InvalidGuarantee(_) => "INVALID_GUARANTEE",
            Self::NegativeItemAmount { .. } => "NEGATIVE_AMOUNT",
            Self::EmptyPaymentName { .. } => "INVALID_PAYMENT_NAME",
            Self::SumMismatch { .. } => "SUM_MISMATCH",
            Self::EmptyTemplate(_) => "TEMPLATE_HAS_NO_ITEMS",
            Self::TemplateTotalMismatch { .. } => "TEMPLATE_TOTAL_MISMATCH",
            Self::DateOutOfRange { .. } => "DATE_OUT_OF_RANGE",
            Self::TicoValidationFailed { report } => report
                .errors
                .first()
                .map_or("TICO_VALIDATION_FAILED", |issue| issue.code.as_str()),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }

    fn details(&self) -> serde_json::Value {
        match self {
            Self::SumMismatch {
                expected_cents,
                actual_cents,
                difference_cents,
            } => json!({
                "expected_cents": expected_cents,
                "actual_cents": actual_cents,
                "difference_cents": difference_cents,
            }),
            Self::DepositAmountOutOfRange {
                amount_cents,
                total_cents,
            } => json!({ "amount_cents": amount_cents, "total_cents": total_cents }),
            Self::TemplateTotalMismatch {
                expected_cents,
                provided_cents,
            } => json!({ "expected_cents": expected_cents, "provided_cents": provided_cents }),
            Self::NegativeItemAmount {
                position,
                amount_cents,
            } => json!({ "position": position, "amount_cents": amount_cents }),
            Self::EmptyPaymentName { position } => json!({ "position": position }),
            Self::TicoValidationFailed { report } => json!({
                "errors": report.errors,
                "warnings": report.warnings,
            }),
            _ => serde_json::Value::Null,
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        Self::Validation {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details: err.details(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tico::{IssueDetails, Severity, TicoIssue, TicoIssueCode};

    #[test]
    fn test_sum_mismatch_carries_difference() {
        let app: AppError = ScheduleError::SumMismatch {
            expected_cents: 10_000,
            actual_cents: 9_000,
            difference_cents: -1_000,
        }
        .into();

        let body = app.to_body();
        assert_eq!(body.code, "SUM_MISMATCH");
        assert_eq!(body.details["difference_cents"], -1_000);
    }

    #[test]
    fn test_tico_failure_uses_first_issue_code() {
        let report = TicoReport {
            is_valid: false,
            errors: vec![TicoIssue {
                code: TicoIssueCode::FinalPaymentTooLate,
                severity: Severity::Error,
                message: "too late".into(),
                details: IssueDetails::TooManyInstallments {
                    count: 1,
                    maximum: 1,
                },
            }],
            warnings: vec![],
        };
        let err = ScheduleError::TicoValidationFailed { report };
        assert_eq!(err.error_code(), "FINAL_PAYMENT_TOO_LATE");

        let app: AppError = err.into();
        let body = app.to_body();
        assert_eq!(body.details["errors"][0]["code"], "FINAL_PAYMENT_TOO_LATE");
        assert!(body.details["warnings"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_status_is_bad_request() {
        assert_eq!(ScheduleError::DepositRequired.http_status_code(), 400);
        assert_eq!(
            AppError::from(ScheduleError::GuaranteeRequired).status_code(),
            400
        );
    }
}
