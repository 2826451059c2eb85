//! `SeaORM` Entity for payment_schedule_configs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{DepositType, ScheduleType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_schedule_configs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub activity_pricing_id: Uuid,
    pub agency_id: Uuid,
    pub schedule_type: ScheduleType,
    pub allow_partial_payments: bool,
    pub deposit_type: Option<DepositType>,
    /// Hundredths of a percent.
    pub deposit_percentage_bps: Option<i32>,
    pub deposit_amount_cents: Option<i64>,
    pub template_id: Option<Uuid>,
    pub template_version: Option<i32>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::activity_pricing::Entity",
        from = "Column::ActivityPricingId",
        to = "super::activity_pricing::Column::Id",
        on_delete = "Cascade"
    )]
    ActivityPricing,
    #[sea_orm(has_many = "super::expected_payment_items::Entity")]
    ExpectedPaymentItems,
    #[sea_orm(has_one = "super::credit_card_guarantees::Entity")]
    CreditCardGuarantees,
}

impl Related<super::activity_pricing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityPricing.def()
    }
}

impl Related<super::expected_payment_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpectedPaymentItems.def()
    }
}

impl Related<super::credit_card_guarantees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditCardGuarantees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
