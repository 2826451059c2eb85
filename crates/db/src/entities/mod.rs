//! `SeaORM` entity definitions.
//!
//! The trip catalogue tables (`trips` down to `activity_pricing`) are owned by
//! other services; this crate only reads them. The payment tables are owned
//! here.

pub mod prelude;

pub mod activity_pricing;
pub mod credit_card_guarantees;
pub mod expected_payment_items;
pub mod itineraries;
pub mod itinerary_activities;
pub mod itinerary_days;
pub mod payment_audit_logs;
pub mod payment_schedule_configs;
pub mod payment_schedule_template_items;
pub mod payment_schedule_templates;
pub mod payment_transactions;
pub mod sea_orm_active_enums;
pub mod trips;
