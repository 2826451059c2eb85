//! Trip-wide booking status.
//!
//! Loads the itinerary tree of a trip level by level with one query per
//! level, then hands the flattened activities to the aggregation service.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;
use uuid::Uuid;
use wayfare_core::booking::{
    ActivityRecord, BookingStatus, BookingStatusService, ItemSnapshot, TripInfo,
};
use wayfare_shared::AppError;

use super::convert;
use crate::entities::{
    activity_pricing, expected_payment_items, itineraries, itinerary_activities, itinerary_days,
    payment_schedule_configs, trips,
};

/// Error types for booking status queries.
#[derive(Debug, thiserror::Error)]
pub enum BookingStatusError {
    /// Trip not found (or owned by another agency).
    #[error("Trip not found: {0}")]
    TripNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<BookingStatusError> for AppError {
    fn from(err: BookingStatusError) -> Self {
        match err {
            BookingStatusError::TripNotFound(id) => Self::NotFound(format!("Trip {id}")),
            BookingStatusError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Booking status repository.
#[derive(Debug, Clone)]
pub struct BookingStatusRepository {
    db: DatabaseConnection,
    upcoming_window_days: u32,
}

impl BookingStatusRepository {
    /// Creates a new booking status repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, upcoming_window_days: u32) -> Self {
        Self {
            db,
            upcoming_window_days,
        }
    }

    /// Builds the payment status of every activity of a trip.
    ///
    /// Activities are ordered by itinerary, day number and position within
    /// the day. Activities without pricing or without a schedule are still
    /// listed.
    ///
    /// # Errors
    ///
    /// Returns `TripNotFound` if the trip does not exist in this agency.
    pub async fn get_booking_status(
        &self,
        trip_id: Uuid,
        agency_id: Uuid,
    ) -> Result<BookingStatus, BookingStatusError> {
        let trip = trips::Entity::find_by_id(trip_id)
            .filter(trips::Column::AgencyId.eq(agency_id))
            .one(&self.db)
            .await?
            .ok_or(BookingStatusError::TripNotFound(trip_id))?;

        let activities = self.load_activities(trip.id).await?;
        debug!(trip_id = %trip.id, activities = activities.len(), "Loaded trip activities");

        let info = TripInfo {
            id: trip.id,
            name: trip.name,
            departure_date: trip.departure_date,
        };
        Ok(BookingStatusService::aggregate(
            info,
            &activities,
            Utc::now().date_naive(),
            self.upcoming_window_days,
        ))
    }

    async fn load_activities(&self, trip_id: Uuid) -> Result<Vec<ActivityRecord>, DbErr> {
        let itineraries = itineraries::Entity::find()
            .filter(itineraries::Column::TripId.eq(trip_id))
            .order_by_asc(itineraries::Column::SequenceOrder)
            .all(&self.db)
            .await?;
        if itineraries.is_empty() {
            return Ok(Vec::new());
        }

        let days = itinerary_days::Entity::find()
            .filter(
                itinerary_days::Column::ItineraryId
                    .is_in(itineraries.iter().map(|i| i.id).collect::<Vec<_>>()),
            )
            .order_by_asc(itinerary_days::Column::DayNumber)
            .all(&self.db)
            .await?;
        if days.is_empty() {
            return Ok(Vec::new());
        }

        let activities = itinerary_activities::Entity::find()
            .filter(
                itinerary_activities::Column::ItineraryDayId
                    .is_in(days.iter().map(|d| d.id).collect::<Vec<_>>()),
            )
            .order_by_asc(itinerary_activities::Column::SequenceOrder)
            .all(&self.db)
            .await?;
        if activities.is_empty() {
            return Ok(Vec::new());
        }

        let pricing: HashMap<Uuid, activity_pricing::Model> = activity_pricing::Entity::find()
            .filter(
                activity_pricing::Column::ActivityId
                    .is_in(activities.iter().map(|a| a.id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| (p.activity_id, p))
            .collect();

        let items_by_pricing = self
            .load_items(pricing.values().map(|p| p.id).collect())
            .await?;

        let mut days_by_itinerary: HashMap<Uuid, Vec<&itinerary_days::Model>> = HashMap::new();
        for day in &days {
            days_by_itinerary.entry(day.itinerary_id).or_default().push(day);
        }
        let mut activities_by_day: HashMap<Uuid, Vec<&itinerary_activities::Model>> =
            HashMap::new();
        for activity in &activities {
            activities_by_day
                .entry(activity.itinerary_day_id)
                .or_default()
                .push(activity);
        }

        let mut records = Vec::with_capacity(activities.len());
        for itinerary in &itineraries {
            let Some(days) = days_by_itinerary.get(&itinerary.id) else {
                continue;
            };
            for day in days {
                let Some(day_activities) = activities_by_day.get(&day.id) else {
                    continue;
                };
                for activity in day_activities {
                    let priced = pricing.get(&activity.id);
                    let items = priced
                        .and_then(|p| items_by_pricing.get(&p.id))
                        .cloned()
                        .unwrap_or_default();
                    records.push(ActivityRecord {
                        activity_id: activity.id,
                        activity_name: activity.name.clone(),
                        activity_type: activity.activity_type.into(),
                        total_price_cents: priced.and_then(|p| p.total_price_cents),
                        currency: priced.map(|p| convert::currency(&p.currency)).transpose()?,
                        items,
                    });
                }
            }
        }

        Ok(records)
    }

    /// Item snapshots keyed by activity pricing ID.
    async fn load_items(
        &self,
        pricing_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<ItemSnapshot>>, DbErr> {
        if pricing_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let configs: HashMap<Uuid, Uuid> = payment_schedule_configs::Entity::find()
            .filter(payment_schedule_configs::Column::ActivityPricingId.is_in(pricing_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.activity_pricing_id))
            .collect();
        if configs.is_empty() {
            return Ok(HashMap::new());
        }

        let items = expected_payment_items::Entity::find()
            .filter(
                expected_payment_items::Column::PaymentScheduleConfigId
                    .is_in(configs.keys().copied().collect::<Vec<_>>()),
            )
            .order_by_asc(expected_payment_items::Column::SequenceOrder)
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<ItemSnapshot>> = HashMap::new();
        for model in items {
            if let Some(pricing_id) = configs.get(&model.payment_schedule_config_id) {
                let item = convert::item(model);
                grouped
                    .entry(*pricing_id)
                    .or_default()
                    .push(ItemSnapshot::from(&item));
            }
        }
        Ok(grouped)
    }
}
