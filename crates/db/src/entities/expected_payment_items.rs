//! `SeaORM` Entity for expected_payment_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expected_payment_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payment_schedule_config_id: Uuid,
    pub agency_id: Uuid,
    pub payment_name: String,
    pub expected_amount_cents: i64,
    pub due_date: Option<Date>,
    pub sequence_order: i32,
    pub status: PaymentStatus,
    pub paid_amount_cents: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment_schedule_configs::Entity",
        from = "Column::PaymentScheduleConfigId",
        to = "super::payment_schedule_configs::Column::Id",
        on_delete = "Cascade"
    )]
    PaymentScheduleConfigs,
    #[sea_orm(has_many = "super::payment_transactions::Entity")]
    PaymentTransactions,
}

impl Related<super::payment_schedule_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentScheduleConfigs.def()
    }
}

impl Related<super::payment_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
