//! Schedule validation and template resolution.
//!
//! Direct create/update only enforces the sum invariant and field ranges;
//! the compliance rule set runs on the template path, after relative
//! offsets have been resolved to absolute dates.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ScheduleError;
use super::types::{
    CreateScheduleInput, DepositSpec, ExpectedItemInput, ExpectedPaymentItem, GuaranteeInput,
    ItemPatch, PaymentScheduleConfig, PricedActivity, ResolvedItem, ScheduleSettings,
    ScheduleType, TemplateApplication, TemplatePlan, UpdateScheduleInput,
};
use crate::calc::{
    OffsetDirection, percentage_of_cents, reconcile_rounding_error, resolve_relative_date,
    saturate_cents, sum_cents,
};
use crate::template::{AmountSpec, PaymentScheduleTemplate, TemplateItem};
use crate::tico::{PaymentLine, TicoValidator};

/// Stateless schedule rules.
pub struct ScheduleService;

impl ScheduleService {
    /// Returns the activity total, failing when it has not been priced.
    pub fn require_total(activity: &PricedActivity) -> Result<i64, ScheduleError> {
        activity
            .total_price_cents
            .ok_or(ScheduleError::MissingTotalPrice(activity.id))
    }

    /// Validates a create request against its activity.
    pub fn validate_create(
        input: &CreateScheduleInput,
        activity: &PricedActivity,
    ) -> Result<ScheduleSettings, ScheduleError> {
        let total = Self::require_total(activity)?;
        let settings = Self::resolve_settings(
            input.schedule_type,
            input.allow_partial_payments,
            input.deposit,
            total,
        )?;

        match &input.guarantee {
            Some(guarantee) => Self::validate_guarantee(guarantee)?,
            None if input.schedule_type == ScheduleType::Guarantee => {
                return Err(ScheduleError::GuaranteeRequired);
            }
            None => {}
        }

        if let Some(items) = &input.items {
            Self::validate_items(items, total)?;
        }
        Ok(settings)
    }

    /// Validates an update request, defaulting unspecified fields to `current`.
    pub fn validate_update(
        current: &PaymentScheduleConfig,
        has_guarantee: bool,
        input: &UpdateScheduleInput,
        activity: &PricedActivity,
    ) -> Result<ScheduleSettings, ScheduleError> {
        let total = Self::require_total(activity)?;
        let schedule_type = input.schedule_type.unwrap_or(current.schedule_type);
        let settings = Self::resolve_settings(
            schedule_type,
            input
                .allow_partial_payments
                .unwrap_or(current.allow_partial_payments),
            input.deposit.or(current.deposit),
            total,
        )?;

        match &input.guarantee {
            Some(guarantee) => Self::validate_guarantee(guarantee)?,
            None if schedule_type == ScheduleType::Guarantee && !has_guarantee => {
                return Err(ScheduleError::GuaranteeRequired);
            }
            None => {}
        }

        if let Some(items) = &input.items {
            Self::validate_items(items, total)?;
        }
        Ok(settings)
    }

    fn resolve_settings(
        schedule_type: ScheduleType,
        allow_partial_payments: bool,
        deposit: Option<DepositSpec>,
        total: i64,
    ) -> Result<ScheduleSettings, ScheduleError> {
        let deposit = if schedule_type == ScheduleType::Deposit {
            Some(Self::validate_deposit(deposit, total)?)
        } else {
            None
        };
        Ok(ScheduleSettings {
            schedule_type,
            allow_partial_payments,
            deposit,
        })
    }

    /// Checks a deposit rule against the activity total.
    pub fn validate_deposit(
        deposit: Option<DepositSpec>,
        total: i64,
    ) -> Result<DepositSpec, ScheduleError> {
        let deposit = deposit.ok_or(ScheduleError::DepositRequired)?;
        match deposit {
            DepositSpec::Percentage(pct) if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED => {
                Err(ScheduleError::DepositPercentageOutOfRange(pct))
            }
            DepositSpec::FixedAmount(amount) if amount < 0 || amount > total => {
                Err(ScheduleError::DepositAmountOutOfRange {
                    amount_cents: amount,
                    total_cents: total,
                })
            }
            valid => Ok(valid),
        }
    }

    /// Checks credit-card guarantee fields.
    pub fn validate_guarantee(guarantee: &GuaranteeInput) -> Result<(), ScheduleError> {
        if guarantee.card_holder_name.trim().is_empty() {
            return Err(ScheduleError::InvalidGuarantee(
                "card holder name cannot be empty".into(),
            ));
        }
        let last_four = guarantee.last_four.as_bytes();
        if last_four.len() != 4 || !last_four.iter().all(u8::is_ascii_digit) {
            return Err(ScheduleError::InvalidGuarantee(
                "last four must be exactly four digits".into(),
            ));
        }
        if guarantee
            .authorization_amount_cents
            .is_some_and(|amount| amount < 0)
        {
            return Err(ScheduleError::InvalidGuarantee(
                "authorization amount cannot be negative".into(),
            ));
        }
        Ok(())
    }

    /// Checks inline items: names, non-negative amounts, exact sum.
    pub fn validate_items(items: &[ExpectedItemInput], total: i64) -> Result<(), ScheduleError> {
        for (index, item) in items.iter().enumerate() {
            let position = index + 1;
            if item.payment_name.trim().is_empty() {
                return Err(ScheduleError::EmptyPaymentName { position });
            }
            if item.expected_amount_cents < 0 {
                return Err(ScheduleError::NegativeItemAmount {
                    position,
                    amount_cents: item.expected_amount_cents,
                });
            }
        }
        Self::check_sum(items.iter().map(|item| item.expected_amount_cents), total)
    }

    /// Fails unless `amounts` add up to exactly `total`.
    pub fn check_sum(
        amounts: impl IntoIterator<Item = i64>,
        total: i64,
    ) -> Result<(), ScheduleError> {
        let actual = sum_cents(amounts);
        if actual == i128::from(total) {
            return Ok(());
        }
        Err(ScheduleError::SumMismatch {
            expected_cents: total,
            actual_cents: saturate_cents(actual),
            difference_cents: saturate_cents(actual - i128::from(total)),
        })
    }

    /// Validates a single-item patch.
    ///
    /// `schedule_sum` is the current sum of every item in the schedule,
    /// including `item`. An amount change must leave the schedule summing to
    /// the activity total.
    pub fn validate_item_patch(
        item: &ExpectedPaymentItem,
        patch: &ItemPatch,
        schedule_sum: i64,
        activity: &PricedActivity,
    ) -> Result<(), ScheduleError> {
        let position = usize::try_from(item.sequence_order).unwrap_or_default();
        if patch
            .payment_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ScheduleError::EmptyPaymentName { position });
        }

        let Some(amount) = patch.expected_amount_cents else {
            return Ok(());
        };
        if amount < 0 {
            return Err(ScheduleError::NegativeItemAmount {
                position,
                amount_cents: amount,
            });
        }
        let total = Self::require_total(activity)?;
        Self::check_sum(
            [schedule_sum, item.expected_amount_cents.saturating_neg(), amount],
            total,
        )
    }

    /// Resolves template items to absolute amounts and dates.
    ///
    /// Amounts are not yet reconciled to the total.
    pub fn resolve_template(
        items: &[TemplateItem],
        application: &TemplateApplication,
    ) -> Result<Vec<ResolvedItem>, ScheduleError> {
        items
            .iter()
            .map(|item| {
                let expected_amount_cents = match item.amount {
                    AmountSpec::Percentage(pct) => {
                        percentage_of_cents(application.total_amount_cents, pct)
                    }
                    AmountSpec::FixedCents(cents) => cents,
                };
                let (days, direction) = item.timing.offset();
                let anchor = match direction {
                    OffsetDirection::After => application.booking_date,
                    OffsetDirection::Before => application.departure_date,
                };
                let due_date = resolve_relative_date(anchor, days, direction).ok_or(
                    ScheduleError::DateOutOfRange {
                        sequence_order: item.sequence_order,
                    },
                )?;
                Ok(ResolvedItem {
                    sequence_order: item.sequence_order,
                    payment_name: item.payment_name.clone(),
                    expected_amount_cents,
                    due_date,
                })
            })
            .collect()
    }

    /// Resolves, reconciles and validates a template against an activity.
    ///
    /// Returns the items to persist and the (valid) compliance report. Any
    /// blocking compliance issue fails the whole plan.
    pub fn plan_from_template(
        template: &PaymentScheduleTemplate,
        activity: &PricedActivity,
        application: &TemplateApplication,
        validator: &TicoValidator,
        as_of: NaiveDate,
    ) -> Result<TemplatePlan, ScheduleError> {
        if template.items.is_empty() {
            return Err(ScheduleError::EmptyTemplate(template.id));
        }

        let total = Self::require_total(activity)?;
        if application.total_amount_cents != total {
            return Err(ScheduleError::TemplateTotalMismatch {
                expected_cents: total,
                provided_cents: application.total_amount_cents,
            });
        }

        let mut items = Self::resolve_template(&template.items, application)?;
        reconcile_rounding_error(&mut items, total);
        items.sort_by_key(|item| item.sequence_order);

        let lines: Vec<PaymentLine> = items.iter().map(ResolvedItem::as_payment_line).collect();
        let report = validator.validate(&lines, total, application.departure_date, as_of);
        if !report.is_valid {
            return Err(ScheduleError::TicoValidationFailed { report });
        }

        Ok(TemplatePlan {
            items,
            settings: Self::template_settings(template),
            report,
        })
    }

    /// Config settings implied by a template.
    ///
    /// Deposit templates take their deposit rule from the first item.
    fn template_settings(template: &PaymentScheduleTemplate) -> ScheduleSettings {
        let deposit = match template.schedule_type {
            ScheduleType::Deposit => template.items.first().map(|item| match item.amount {
                AmountSpec::Percentage(pct) => DepositSpec::Percentage(pct),
                AmountSpec::FixedCents(cents) => DepositSpec::FixedAmount(cents),
            }),
            _ => None,
        };
        ScheduleSettings {
            schedule_type: template.schedule_type,
            allow_partial_payments: matches!(
                template.schedule_type,
                ScheduleType::Deposit | ScheduleType::Installments
            ),
            deposit,
        }
    }
}
