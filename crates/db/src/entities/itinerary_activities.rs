//! `SeaORM` Entity for itinerary_activities table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ActivityType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "itinerary_activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub itinerary_day_id: Uuid,
    pub agency_id: Uuid,
    pub name: String,
    pub activity_type: ActivityType,
    pub sequence_order: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::itinerary_days::Entity",
        from = "Column::ItineraryDayId",
        to = "super::itinerary_days::Column::Id",
        on_delete = "Cascade"
    )]
    ItineraryDays,
    #[sea_orm(has_one = "super::activity_pricing::Entity")]
    ActivityPricing,
}

impl Related<super::itinerary_days::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItineraryDays.def()
    }
}

impl Related<super::activity_pricing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityPricing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
