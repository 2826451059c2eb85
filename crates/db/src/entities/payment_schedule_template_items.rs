//! `SeaORM` Entity for payment_schedule_template_items table.
//!
//! Exactly one of `percentage_bps`/`fixed_amount_cents` and exactly one of
//! `days_from_booking`/`days_before_departure` is set on every row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_schedule_template_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub template_id: Uuid,
    pub sequence_order: i32,
    pub payment_name: String,
    /// Hundredths of a percent.
    pub percentage_bps: Option<i32>,
    pub fixed_amount_cents: Option<i64>,
    pub days_from_booking: Option<i32>,
    pub days_before_departure: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment_schedule_templates::Entity",
        from = "Column::TemplateId",
        to = "super::payment_schedule_templates::Column::Id",
        on_delete = "Cascade"
    )]
    PaymentScheduleTemplates,
}

impl Related<super::payment_schedule_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentScheduleTemplates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
