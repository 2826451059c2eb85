//! The TICO rule set.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::rules::TicoRules;
use super::types::{IssueDetails, PaymentLine, Severity, TicoIssue, TicoIssueCode, TicoReport};
use crate::calc::{days_between, saturate_cents, sum_cents};

/// Stateless validator for resolved payment schedules.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicoValidator {
    rules: TicoRules,
}

impl TicoValidator {
    /// Creates a validator enforcing `rules`.
    #[must_use]
    pub const fn new(rules: TicoRules) -> Self {
        Self { rules }
    }

    /// Returns the thresholds in force.
    #[must_use]
    pub const fn rules(&self) -> &TicoRules {
        &self.rules
    }

    /// Validates `lines` against `total_cents` and `departure_date`.
    ///
    /// `as_of` is the reference "today" for the past-due warning. Every rule
    /// runs, so the report lists all findings rather than the first.
    #[must_use]
    pub fn validate(
        &self,
        lines: &[PaymentLine],
        total_cents: i64,
        departure_date: NaiveDate,
        as_of: NaiveDate,
    ) -> TicoReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Some(issue) = Self::check_sum(lines, total_cents) {
            errors.push(issue);
        }
        if let Some(issue) = self.check_final_payment(lines, departure_date) {
            errors.push(issue);
        }
        errors.extend(self.check_minimum_amounts(lines));
        if let Some(issue) = self.check_installment_count(lines) {
            errors.push(issue);
        }

        if let Some(issue) = self.check_high_deposit(lines, total_cents) {
            warnings.push(issue);
        }
        warnings.extend(Self::check_past_due(lines, as_of));

        TicoReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn check_sum(lines: &[PaymentLine], total_cents: i64) -> Option<TicoIssue> {
        let wide = sum_cents(lines.iter().map(|line| line.expected_amount_cents));
        if wide == i128::from(total_cents) {
            return None;
        }

        let actual = saturate_cents(wide);
        let difference = saturate_cents(wide - i128::from(total_cents));
        Some(TicoIssue {
            code: TicoIssueCode::SumMismatch,
            severity: Severity::Error,
            message: format!(
                "Payment items total {actual} cents but the booking total is {total_cents} cents (difference {difference})"
            ),
            details: IssueDetails::SumMismatch {
                expected_cents: total_cents,
                actual_cents: actual,
                difference_cents: difference,
            },
        })
    }

    fn check_final_payment(
        &self,
        lines: &[PaymentLine],
        departure_date: NaiveDate,
    ) -> Option<TicoIssue> {
        let last = lines.iter().max_by_key(|line| line.sequence_order)?;
        let due_date = last.due_date?;
        let days = days_between(departure_date, due_date);
        if days >= self.rules.min_days_before_departure {
            return None;
        }

        Some(TicoIssue {
            code: TicoIssueCode::FinalPaymentTooLate,
            severity: Severity::Error,
            message: format!(
                "Final payment is due {days} days before departure; at least {} days are required",
                self.rules.min_days_before_departure
            ),
            details: IssueDetails::FinalPaymentTooLate {
                due_date,
                departure_date,
                days_before_departure: days,
                required_days: self.rules.min_days_before_departure,
            },
        })
    }

    fn check_minimum_amounts<'a>(
        &'a self,
        lines: &'a [PaymentLine],
    ) -> impl Iterator<Item = TicoIssue> + 'a {
        let minimum = self.rules.min_payment_cents;
        lines
            .iter()
            .filter(move |line| line.expected_amount_cents < minimum)
            .map(move |line| TicoIssue {
                code: TicoIssueCode::PaymentTooSmall,
                severity: Severity::Error,
                message: format!(
                    "Payment {} is {} cents; the minimum is {minimum} cents",
                    line.sequence_order, line.expected_amount_cents
                ),
                details: IssueDetails::PaymentTooSmall {
                    sequence_order: line.sequence_order,
                    amount_cents: line.expected_amount_cents,
                    minimum_cents: minimum,
                },
            })
    }

    fn check_installment_count(&self, lines: &[PaymentLine]) -> Option<TicoIssue> {
        let maximum = self.rules.max_installments;
        (lines.len() > maximum).then(|| TicoIssue {
            code: TicoIssueCode::TooManyInstallments,
            severity: Severity::Error,
            message: format!(
                "Schedule has {} payments; at most {maximum} are allowed",
                lines.len()
            ),
            details: IssueDetails::TooManyInstallments {
                count: lines.len(),
                maximum,
            },
        })
    }

    fn check_high_deposit(&self, lines: &[PaymentLine], total_cents: i64) -> Option<TicoIssue> {
        if total_cents <= 0 {
            return None;
        }

        let first = lines.iter().min_by_key(|line| line.sequence_order)?;
        let deposit = first.expected_amount_cents;
        let threshold = self.rules.high_deposit_percent;
        if i128::from(deposit) * 100 <= i128::from(total_cents) * i128::from(threshold) {
            return None;
        }

        let deposit_percent = (Decimal::from(deposit) * Decimal::ONE_HUNDRED
            / Decimal::from(total_cents))
        .round_dp(2);
        Some(TicoIssue {
            code: TicoIssueCode::HighDeposit,
            severity: Severity::Warning,
            message: format!(
                "Deposit is {deposit_percent}% of the total, above the {threshold}% guideline"
            ),
            details: IssueDetails::HighDeposit {
                deposit_cents: deposit,
                total_cents,
                deposit_percent,
                threshold_percent: threshold,
            },
        })
    }

    fn check_past_due(
        lines: &[PaymentLine],
        as_of: NaiveDate,
    ) -> impl Iterator<Item = TicoIssue> + '_ {
        lines.iter().filter_map(move |line| {
            let due_date = line.due_date.filter(|due| *due < as_of)?;
            Some(TicoIssue {
                code: TicoIssueCode::PastDueDate,
                severity: Severity::Warning,
                message: format!(
                    "Payment {} was due on {due_date}, which is already past",
                    line.sequence_order
                ),
                details: IssueDetails::PastDueDate {
                    sequence_order: line.sequence_order,
                    due_date,
                    as_of,
                },
            })
        })
    }
}
