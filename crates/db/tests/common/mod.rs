//! Shared fixtures for the repository integration tests.
//!
//! Every test gets its own in-memory SQLite database with the real
//! migrations applied. The pool holds a single connection, so the database
//! lives exactly as long as the returned handle.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;
use wayfare_core::audit::{Actor, AuditEntry};
use wayfare_db::AuditSink;
use wayfare_db::entities::sea_orm_active_enums::ActivityType;
use wayfare_db::entities::{
    activity_pricing, itineraries, itinerary_activities, itinerary_days, trips,
};
use wayfare_db::migration::{Migrator, MigratorTrait};

/// Opens a fresh migrated database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory SQLite database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn days_from_today(days: u64) -> NaiveDate {
    today() + Days::new(days)
}

pub fn days_ago(days: u64) -> NaiveDate {
    today() - Days::new(days)
}

pub fn actor() -> Actor {
    Actor::user(Uuid::new_v4())
}

/// Audit sink that keeps entries in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl RecordingAuditSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit lock poisoned").clone()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn append(&self, entry: AuditEntry) {
        self.entries.lock().expect("audit lock poisoned").push(entry);
    }
}

/// A trip with a single itinerary, built up day by day.
pub struct TripFixture {
    pub agency_id: Uuid,
    pub trip_id: Uuid,
    pub itinerary_id: Uuid,
}

impl TripFixture {
    pub async fn create(db: &DatabaseConnection, agency_id: Uuid, departure: NaiveDate) -> Self {
        let now = Utc::now();
        let trip = trips::ActiveModel {
            id: Set(Uuid::new_v4()),
            agency_id: Set(agency_id),
            name: Set("Lisbon & Porto".to_string()),
            departure_date: Set(Some(departure)),
            return_date: Set(Some(departure + Days::new(10))),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await
        .expect("Failed to insert trip");

        let itinerary = itineraries::ActiveModel {
            id: Set(Uuid::new_v4()),
            trip_id: Set(trip.id),
            agency_id: Set(agency_id),
            name: Set("Main itinerary".to_string()),
            sequence_order: Set(1),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await
        .expect("Failed to insert itinerary");

        Self {
            agency_id,
            trip_id: trip.id,
            itinerary_id: itinerary.id,
        }
    }

    pub async fn add_day(&self, db: &DatabaseConnection, day_number: i32) -> Uuid {
        let now = Utc::now();
        itinerary_days::ActiveModel {
            id: Set(Uuid::new_v4()),
            itinerary_id: Set(self.itinerary_id),
            agency_id: Set(self.agency_id),
            day_number: Set(day_number),
            date: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await
        .expect("Failed to insert itinerary day")
        .id
    }

    /// Adds an activity and, when `total_price_cents` is set, its pricing.
    ///
    /// Returns `(activity_id, activity_pricing_id)`.
    pub async fn add_activity(
        &self,
        db: &DatabaseConnection,
        day_id: Uuid,
        sequence_order: i32,
        name: &str,
        activity_type: ActivityType,
        total_price_cents: Option<i64>,
    ) -> (Uuid, Option<Uuid>) {
        let now = Utc::now();
        let activity = itinerary_activities::ActiveModel {
            id: Set(Uuid::new_v4()),
            itinerary_day_id: Set(day_id),
            agency_id: Set(self.agency_id),
            name: Set(name.to_string()),
            activity_type: Set(activity_type),
            sequence_order: Set(sequence_order),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await
        .expect("Failed to insert activity");

        let Some(total) = total_price_cents else {
            return (activity.id, None);
        };
        let pricing = insert_pricing(db, activity.id, self.agency_id, Some(total), "CAD").await;
        (activity.id, Some(pricing))
    }
}

pub async fn insert_pricing(
    db: &DatabaseConnection,
    activity_id: Uuid,
    agency_id: Uuid,
    total_price_cents: Option<i64>,
    currency: &str,
) -> Uuid {
    let now = Utc::now();
    activity_pricing::ActiveModel {
        id: Set(Uuid::new_v4()),
        activity_id: Set(activity_id),
        agency_id: Set(agency_id),
        total_price_cents: Set(total_price_cents),
        currency: Set(currency.to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .expect("Failed to insert activity pricing")
    .id
}

/// Seeds a trip departing in 180 days with one priced activity.
///
/// Returns the fixture and the activity pricing ID.
pub async fn priced_activity(
    db: &DatabaseConnection,
    agency_id: Uuid,
    total_price_cents: Option<i64>,
) -> (TripFixture, Uuid) {
    let trip = TripFixture::create(db, agency_id, days_from_today(180)).await;
    let day = trip.add_day(db, 1).await;
    let (activity_id, _) = trip
        .add_activity(db, day, 1, "Hotel Avenida", ActivityType::Lodging, None)
        .await;
    let pricing_id = insert_pricing(db, activity_id, agency_id, total_price_cents, "CAD").await;
    (trip, pricing_id)
}
