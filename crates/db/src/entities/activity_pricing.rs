//! `SeaORM` Entity for activity_pricing table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_pricing")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub activity_id: Uuid,
    pub agency_id: Uuid,
    pub total_price_cents: Option<i64>,
    pub currency: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::itinerary_activities::Entity",
        from = "Column::ActivityId",
        to = "super::itinerary_activities::Column::Id",
        on_delete = "Cascade"
    )]
    ItineraryActivities,
    #[sea_orm(has_one = "super::payment_schedule_configs::Entity")]
    PaymentScheduleConfigs,
}

impl Related<super::itinerary_activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItineraryActivities.def()
    }
}

impl Related<super::payment_schedule_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentScheduleConfigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
