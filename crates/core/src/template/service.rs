//! Template item-set validation.

use std::collections::HashSet;

use rust_decimal::Decimal;

use super::error::TemplateError;
use super::types::{AmountSpec, TemplateItem, TemplateItemPayload, TimingSpec};

/// Allowed drift when percentages must add up to 100.
const PERCENTAGE_SUM_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Stateless template rules.
pub struct TemplateService;

impl TemplateService {
    /// Trims a template name, rejecting blank names.
    pub fn normalize_name(name: &str) -> Result<String, TemplateError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TemplateError::EmptyName);
        }
        Ok(trimmed.to_string())
    }

    /// Validates a raw item set and returns typed items ordered by sequence.
    ///
    /// Each item must name exactly one amount rule and exactly one timing
    /// rule. When every item is a percentage, the percentages must sum to
    /// 100 within 0.01.
    pub fn validate_items(
        payloads: &[TemplateItemPayload],
    ) -> Result<Vec<TemplateItem>, TemplateError> {
        if payloads.is_empty() {
            return Err(TemplateError::NoItems);
        }

        let mut items = payloads
            .iter()
            .enumerate()
            .map(|(index, payload)| Self::parse_item(index + 1, payload))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.sequence_order) {
                return Err(TemplateError::DuplicateSequence {
                    sequence_order: item.sequence_order,
                });
            }
        }

        let percentages: Option<Vec<Decimal>> =
            items.iter().map(|item| item.amount.percentage()).collect();
        if let Some(percentages) = percentages {
            let total: Decimal = percentages.iter().sum();
            if (total - Decimal::ONE_HUNDRED).abs() > PERCENTAGE_SUM_TOLERANCE {
                return Err(TemplateError::PercentageSumMismatch { total });
            }
        }

        items.sort_by_key(|item| item.sequence_order);
        Ok(items)
    }

    fn parse_item(
        position: usize,
        payload: &TemplateItemPayload,
    ) -> Result<TemplateItem, TemplateError> {
        let payment_name = payload.payment_name.trim();
        if payment_name.is_empty() {
            return Err(TemplateError::EmptyPaymentName { position });
        }

        let amount = Self::parse_amount(position, payload)?;
        let timing = Self::parse_timing(position, payload)?;
        let sequence_order = payload
            .sequence_order
            .unwrap_or_else(|| i32::try_from(position).unwrap_or(i32::MAX));

        Ok(TemplateItem {
            sequence_order,
            payment_name: payment_name.to_string(),
            amount,
            timing,
        })
    }

    fn parse_amount(
        position: usize,
        payload: &TemplateItemPayload,
    ) -> Result<AmountSpec, TemplateError> {
        match (payload.percentage, payload.fixed_amount_cents) {
            (Some(_), Some(_)) => Err(TemplateError::AmountSpecConflict { position }),
            (None, None) => Err(TemplateError::AmountSpecMissing { position }),
            (Some(percentage), None) => {
                if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
                    return Err(TemplateError::PercentageOutOfRange {
                        position,
                        percentage,
                    });
                }
                if percentage.normalize().scale() > 2 {
                    return Err(TemplateError::PercentagePrecision {
                        position,
                        percentage,
                    });
                }
                Ok(AmountSpec::Percentage(percentage))
            }
            (None, Some(amount_cents)) => {
                if amount_cents <= 0 {
                    return Err(TemplateError::NonPositiveFixedAmount {
                        position,
                        amount_cents,
                    });
                }
                Ok(AmountSpec::FixedCents(amount_cents))
            }
        }
    }

    fn parse_timing(
        position: usize,
        payload: &TemplateItemPayload,
    ) -> Result<TimingSpec, TemplateError> {
        let non_negative = |days: i32| {
            u32::try_from(days).map_err(|_| TemplateError::NegativeDayOffset { position, days })
        };

        match (payload.days_from_booking, payload.days_before_departure) {
            (Some(_), Some(_)) => Err(TemplateError::TimingSpecConflict { position }),
            (None, None) => Err(TemplateError::TimingSpecMissing { position }),
            (Some(days), None) => Ok(TimingSpec::FromBooking(non_negative(days)?)),
            (None, Some(days)) => Ok(TimingSpec::BeforeDeparture(non_negative(days)?)),
        }
    }
}
