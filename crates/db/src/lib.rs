//! Database layer for payment schedules.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Agency-scoped repositories for templates, schedules, transactions and
//!   booking status
//! - Audit sinks
//! - Database migrations

pub mod audit;
pub mod entities;
pub mod migration;
pub mod repositories;

pub use audit::{AuditSink, DbAuditSink, TracingAuditSink};
pub use repositories::{
    ActivityPricingRepository, BookingStatusRepository, PricedActivityLookup, ScheduleRepository,
    TemplateRepository, TransactionRepository,
};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;
use wayfare_shared::DatabaseConfig;

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool ready"
    );
    Ok(db)
}
