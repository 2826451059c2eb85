//! `SeaORM` Entity for credit_card_guarantees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_card_guarantees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub payment_schedule_config_id: Uuid,
    pub card_holder_name: String,
    pub last_four: String,
    pub authorization_code: Option<String>,
    pub authorization_date: Option<Date>,
    pub authorization_amount_cents: Option<i64>,
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
}

impl Related<super::payment_schedule_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentScheduleConfigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
