//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and use the schema builder
//! only, so the same set runs on `PostgreSQL` and on the `SQLite` databases
//! the integration tests use.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_trip_catalog;
mod m20260301_000002_payment_schedules;
mod m20260301_000003_payment_audit_logs;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_trip_catalog::Migration),
            Box::new(m20260301_000002_payment_schedules::Migration),
            Box::new(m20260301_000003_payment_audit_logs::Migration),
        ]
    }
}
