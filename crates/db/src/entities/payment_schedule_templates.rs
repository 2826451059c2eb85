//! `SeaORM` Entity for payment_schedule_templates table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ScheduleType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_schedule_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub agency_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub schedule_type: ScheduleType,
    pub is_default: bool,
    pub is_active: bool,
    pub version: i32,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payment_schedule_template_items::Entity")]
    PaymentScheduleTemplateItems,
}

impl Related<super::payment_schedule_template_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentScheduleTemplateItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
