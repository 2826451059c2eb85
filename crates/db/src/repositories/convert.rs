//! Row to domain conversions shared by the repositories.

use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use wayfare_core::payments::PaymentTransaction;
use wayfare_core::schedule::{
    CreditCardGuarantee, DepositSpec, ExpectedPaymentItem, PaymentScheduleConfig, PricedActivity,
};
use wayfare_core::template::{AmountSpec, TemplateItem, TimingSpec};
use wayfare_shared::CurrencyCode;

use crate::entities::sea_orm_active_enums::DepositType;
use crate::entities::{
    activity_pricing, credit_card_guarantees, expected_payment_items, payment_schedule_configs,
    payment_schedule_template_items, payment_transactions,
};

fn utc(value: sea_orm::prelude::DateTimeWithTimeZone) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

pub(crate) fn currency(code: &str) -> Result<CurrencyCode, DbErr> {
    code.parse()
        .map_err(|e: String| DbErr::Custom(format!("stored currency {code:?}: {e}")))
}

pub(crate) fn priced_activity(model: activity_pricing::Model) -> Result<PricedActivity, DbErr> {
    Ok(PricedActivity {
        id: model.id,
        agency_id: model.agency_id,
        total_price_cents: model.total_price_cents,
        currency: currency(&model.currency)?,
    })
}

pub(crate) fn config(model: payment_schedule_configs::Model) -> PaymentScheduleConfig {
    let deposit = match model.deposit_type {
        Some(DepositType::Percentage) => model
            .deposit_percentage_bps
            .map(DepositSpec::from_basis_points),
        Some(DepositType::FixedAmount) => model.deposit_amount_cents.map(DepositSpec::FixedAmount),
        None => None,
    };
    PaymentScheduleConfig {
        id: model.id,
        activity_pricing_id: model.activity_pricing_id,
        agency_id: model.agency_id,
        schedule_type: model.schedule_type.into(),
        allow_partial_payments: model.allow_partial_payments,
        deposit,
        template_id: model.template_id,
        template_version: model.template_version,
        created_by: model.created_by,
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
    }
}

pub(crate) fn item(model: expected_payment_items::Model) -> ExpectedPaymentItem {
    ExpectedPaymentItem {
        id: model.id,
        payment_schedule_config_id: model.payment_schedule_config_id,
        agency_id: model.agency_id,
        payment_name: model.payment_name,
        expected_amount_cents: model.expected_amount_cents,
        due_date: model.due_date,
        sequence_order: model.sequence_order,
        status: model.status.into(),
        paid_amount_cents: model.paid_amount_cents,
        created_at: utc(model.created_at),
        updated_at: utc(model.updated_at),
    }
}

pub(crate) fn guarantee(model: credit_card_guarantees::Model) -> CreditCardGuarantee {
    CreditCardGuarantee {
        id: model.id,
        payment_schedule_config_id: model.payment_schedule_config_id,
        card_holder_name: model.card_holder_name,
        last_four: model.last_four,
        authorization_code: model.authorization_code,
        authorization_date: model.authorization_date,
        authorization_amount_cents: model.authorization_amount_cents,
    }
}

pub(crate) fn transaction(
    model: payment_transactions::Model,
) -> Result<PaymentTransaction, DbErr> {
    Ok(PaymentTransaction {
        id: model.id,
        expected_payment_item_id: model.expected_payment_item_id,
        agency_id: model.agency_id,
        transaction_type: model.transaction_type.into(),
        amount_cents: model.amount_cents,
        currency: currency(&model.currency)?,
        payment_method: model.payment_method,
        reference_number: model.reference_number,
        transaction_date: model.transaction_date,
        notes: model.notes,
        created_by: model.created_by,
        created_at: utc(model.created_at),
    })
}

pub(crate) fn template_item(
    model: payment_schedule_template_items::Model,
) -> Result<TemplateItem, DbErr> {
    let corrupt = |what: &str| {
        DbErr::Custom(format!(
            "template item {} has an invalid {what} specification",
            model.id
        ))
    };

    let amount = match (model.percentage_bps, model.fixed_amount_cents) {
        (Some(bps), None) => AmountSpec::from_basis_points(bps),
        (None, Some(cents)) => AmountSpec::FixedCents(cents),
        _ => return Err(corrupt("amount")),
    };
    let timing = match (model.days_from_booking, model.days_before_departure) {
        (Some(days), None) => {
            TimingSpec::FromBooking(u32::try_from(days).map_err(|_| corrupt("timing"))?)
        }
        (None, Some(days)) => {
            TimingSpec::BeforeDeparture(u32::try_from(days).map_err(|_| corrupt("timing"))?)
        }
        _ => return Err(corrupt("timing")),
    };

    Ok(TemplateItem {
        sequence_order: model.sequence_order,
        payment_name: model.payment_name,
        amount,
        timing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn template_row(
        percentage_bps: Option<i32>,
        fixed_amount_cents: Option<i64>,
        days_from_booking: Option<i32>,
        days_before_departure: Option<i32>,
    ) -> payment_schedule_template_items::Model {
        payment_schedule_template_items::Model {
            id: Uuid::new_v4(),
            template_id: Uuid::new_v4(),
            sequence_order: 1,
            payment_name: "Deposit".to_string(),
            percentage_bps,
            fixed_amount_cents,
            days_from_booking,
            days_before_departure,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_template_item_rejects_ambiguous_rows() {
        assert!(template_item(template_row(Some(2500), Some(100), Some(0), None)).is_err());
        assert!(template_item(template_row(None, None, Some(0), None)).is_err());
        assert!(template_item(template_row(Some(2500), None, Some(0), Some(30))).is_err());
        assert!(template_item(template_row(Some(2500), None, Some(-1), None)).is_err());
    }

    #[test]
    fn test_unknown_stored_currency_is_an_error() {
        assert!(currency("CAD").is_ok());
        assert!(matches!(currency("dollars"), Err(DbErr::Custom(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Stored basis points come back as the same basis points.
        #[test]
        fn prop_percentage_row_round_trips(bps in 0i32..=10_000, days in 0i32..=365) {
            let item = template_item(template_row(Some(bps), None, None, Some(days))).unwrap();
            prop_assert_eq!(item.amount.percentage_basis_points(), Some(bps));
            prop_assert_eq!(item.timing.days_before_departure(), Some(u32::try_from(days).unwrap()));
        }

        #[test]
        fn prop_fixed_row_round_trips(cents in 1i64..=10_000_000, days in 0i32..=365) {
            let item = template_item(template_row(None, Some(cents), Some(days), None)).unwrap();
            prop_assert_eq!(item.amount.fixed_cents(), Some(cents));
            prop_assert_eq!(item.timing.days_from_booking(), Some(u32::try_from(days).unwrap()));
        }
    }
}
