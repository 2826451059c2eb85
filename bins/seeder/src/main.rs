//! Demo data seeder for Wayfare development.
//!
//! Seeds one agency with a trip, an itinerary and three priced activities,
//! plus a default deposit template. The template is applied to the hotel, the
//! flight gets an inline two-part schedule and a deposit is recorded. The
//! resulting booking status is printed as JSON.
//!
//! Run the migrator first, then: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use wayfare_core::audit::Actor;
use wayfare_core::payments::{CreateTransactionInput, TransactionType};
use wayfare_core::schedule::{
    ApplyTemplateInput, CreateScheduleInput, ExpectedItemInput, ScheduleType,
};
use wayfare_core::template::{CreateTemplateInput, TemplateItemPayload};
use wayfare_core::tico::TicoRules;
use wayfare_db::entities::sea_orm_active_enums::ActivityType;
use wayfare_db::entities::{
    activity_pricing, itineraries, itinerary_activities, itinerary_days, trips,
};
use wayfare_db::{
    AuditSink, BookingStatusRepository, DbAuditSink, ScheduleRepository, TemplateRepository,
    TransactionRepository,
};
use wayfare_shared::{AppConfig, CurrencyCode};

/// Demo agency (consistent across runs)
const DEMO_AGENCY_ID: Uuid = Uuid::from_u128(0x0001);
/// Demo agent performing every write
const DEMO_USER_ID: Uuid = Uuid::from_u128(0x0002);
/// Demo trip
const DEMO_TRIP_ID: Uuid = Uuid::from_u128(0x0010);

/// Priced activities seeded on the demo trip.
struct SeededActivities {
    hotel_pricing_id: Uuid,
    flight_pricing_id: Uuid,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wayfare=debug,seeder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = wayfare_db::connect(&config.database).await?;

    let departure = Utc::now().date_naive() + Days::new(150);
    let actor = Actor::user(DEMO_USER_ID);
    let audit: Arc<dyn AuditSink> = Arc::new(DbAuditSink::new(db.clone()));

    if trips::Entity::find_by_id(DEMO_TRIP_ID).one(&db).await?.is_some() {
        info!(trip_id = %DEMO_TRIP_ID, "Demo trip already exists, skipping seed");
    } else {
        let activities = seed_catalog(&db, departure).await?;
        seed_payments(&db, &config, &audit, &actor, &activities, departure).await?;
        info!("Seeding complete");
    }

    let status = BookingStatusRepository::new(db, config.reporting.upcoming_window_days)
        .get_booking_status(DEMO_TRIP_ID, DEMO_AGENCY_ID)
        .await?;
    println!("{}", serde_json::to_string_pretty(&status)?);

    Ok(())
}

/// Seeds the trip, one itinerary with two days and three activities.
async fn seed_catalog(
    db: &DatabaseConnection,
    departure: NaiveDate,
) -> anyhow::Result<SeededActivities> {
    let now = Utc::now();

    trips::ActiveModel {
        id: Set(DEMO_TRIP_ID),
        agency_id: Set(DEMO_AGENCY_ID),
        name: Set("Portugal Highlights".to_string()),
        departure_date: Set(Some(departure)),
        return_date: Set(Some(departure + Days::new(9))),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;

    let itinerary = itineraries::ActiveModel {
        id: Set(Uuid::new_v4()),
        trip_id: Set(DEMO_TRIP_ID),
        agency_id: Set(DEMO_AGENCY_ID),
        name: Set("Lisbon and the Douro".to_string()),
        sequence_order: Set(1),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;

    let mut day_ids = Vec::new();
    for (offset, day_number) in [(0, 1), (1, 2)] {
        let day = itinerary_days::ActiveModel {
            id: Set(Uuid::new_v4()),
            itinerary_id: Set(itinerary.id),
            agency_id: Set(DEMO_AGENCY_ID),
            day_number: Set(day_number),
            date: Set(departure.checked_add_days(Days::new(offset))),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await?;
        day_ids.push(day.id);
    }

    let flight = seed_activity(
        db,
        day_ids[0],
        1,
        "TP 258 YYZ-LIS",
        ActivityType::Flight,
        Some(184_000),
    )
    .await?;
    let hotel = seed_activity(
        db,
        day_ids[0],
        2,
        "Hotel Avenida Palace",
        ActivityType::Lodging,
        Some(240_000),
    )
    .await?;
    seed_activity(
        db,
        day_ids[1],
        1,
        "Alfama walking tour",
        ActivityType::Tour,
        None,
    )
    .await?;

    info!(trip_id = %DEMO_TRIP_ID, "Seeded demo trip catalogue");
    Ok(SeededActivities {
        hotel_pricing_id: hotel.context("hotel is priced")?,
        flight_pricing_id: flight.context("flight is priced")?,
    })
}

/// Seeds an activity and, when priced, its pricing row.
async fn seed_activity(
    db: &DatabaseConnection,
    day_id: Uuid,
    sequence_order: i32,
    name: &str,
    activity_type: ActivityType,
    total_price_cents: Option<i64>,
) -> anyhow::Result<Option<Uuid>> {
    let now = Utc::now();
    let activity = itinerary_activities::ActiveModel {
        id: Set(Uuid::new_v4()),
        itinerary_day_id: Set(day_id),
        agency_id: Set(DEMO_AGENCY_ID),
        name: Set(name.to_string()),
        activity_type: Set(activity_type),
        sequence_order: Set(sequence_order),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;

    let Some(total) = total_price_cents else {
        return Ok(None);
    };
    let pricing = activity_pricing::ActiveModel {
        id: Set(Uuid::new_v4()),
        activity_id: Set(activity.id),
        agency_id: Set(DEMO_AGENCY_ID),
        total_price_cents: Set(Some(total)),
        currency: Set("CAD".to_string()),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;
    Ok(Some(pricing.id))
}

/// Creates the default template, the two schedules and a deposit payment.
async fn seed_payments(
    db: &DatabaseConnection,
    config: &AppConfig,
    audit: &Arc<dyn AuditSink>,
    actor: &Actor,
    activities: &SeededActivities,
    departure: NaiveDate,
) -> anyhow::Result<()> {
    let templates = TemplateRepository::new(db.clone(), audit.clone());
    let schedules = ScheduleRepository::new(db.clone(), audit.clone())
        .with_rules(TicoRules::from(&config.compliance));
    let ledger = TransactionRepository::new(db.clone(), audit.clone());

    let template = templates
        .create(
            DEMO_AGENCY_ID,
            actor,
            CreateTemplateInput {
                name: "Standard deposit".to_string(),
                description: Some("25% at booking, balance 60 days out".to_string()),
                schedule_type: ScheduleType::Deposit,
                is_default: true,
                items: vec![
                    TemplateItemPayload {
                        payment_name: "Deposit".to_string(),
                        sequence_order: Some(1),
                        percentage: Some(Decimal::from(25)),
                        days_from_booking: Some(0),
                        ..TemplateItemPayload::default()
                    },
                    TemplateItemPayload {
                        payment_name: "Final balance".to_string(),
                        sequence_order: Some(2),
                        percentage: Some(Decimal::from(75)),
                        days_before_departure: Some(60),
                        ..TemplateItemPayload::default()
                    },
                ],
            },
        )
        .await?;

    let applied = schedules
        .apply_template(
            activities.hotel_pricing_id,
            DEMO_AGENCY_ID,
            actor,
            ApplyTemplateInput {
                template_id: template.id,
                booking_date: None,
                departure_date: departure,
                total_amount_cents: 240_000,
            },
        )
        .await?;

    let today = Utc::now().date_naive();
    schedules
        .create(
            DEMO_AGENCY_ID,
            actor,
            CreateScheduleInput {
                activity_pricing_id: activities.flight_pricing_id,
                schedule_type: ScheduleType::Installments,
                allow_partial_payments: true,
                deposit: None,
                items: Some(vec![
                    ExpectedItemInput {
                        payment_name: "Seat hold".to_string(),
                        expected_amount_cents: 50_000,
                        due_date: Some(today + Days::new(3)),
                    },
                    ExpectedItemInput {
                        payment_name: "Ticketing".to_string(),
                        expected_amount_cents: 134_000,
                        due_date: departure.checked_sub_days(Days::new(75)),
                    },
                ]),
                guarantee: None,
            },
        )
        .await?;

    let deposit = applied
        .schedule
        .items
        .first()
        .context("applied template produced no items")?;
    let currency: CurrencyCode = "CAD".parse().map_err(anyhow::Error::msg)?;
    ledger
        .create(
            DEMO_AGENCY_ID,
            actor,
            CreateTransactionInput {
                expected_payment_item_id: deposit.id,
                transaction_type: TransactionType::Payment,
                amount_cents: deposit.expected_amount_cents,
                currency,
                payment_method: Some("visa".to_string()),
                reference_number: Some("DEMO-0001".to_string()),
                transaction_date: today,
                notes: Some("Deposit taken at booking".to_string()),
            },
        )
        .await?;

    info!(template_id = %template.id, "Seeded payment schedules");
    Ok(())
}
