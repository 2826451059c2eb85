//! `SeaORM` Entity for itinerary_days table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "itinerary_days")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub itinerary_id: Uuid,
    pub agency_id: Uuid,
    pub day_number: i32,
    pub date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::itineraries::Entity",
        from = "Column::ItineraryId",
        to = "super::itineraries::Column::Id",
        on_delete = "Cascade"
    )]
    Itineraries,
    #[sea_orm(has_many = "super::itinerary_activities::Entity")]
    ItineraryActivities,
}

impl Related<super::itineraries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Itineraries.def()
    }
}

impl Related<super::itinerary_activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItineraryActivities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
