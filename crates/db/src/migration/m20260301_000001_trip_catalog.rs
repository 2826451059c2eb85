//! Creates the trip catalogue tables the payment core reads from.
//!
//! Trips, itineraries, days, activities and activity pricing are maintained by
//! the itinerary services; only the columns the payment core needs are here.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Trips::AgencyId).uuid().not_null())
                    .col(ColumnDef::new(Trips::Name).string().not_null())
                    .col(ColumnDef::new(Trips::DepartureDate).date().null())
                    .col(ColumnDef::new(Trips::ReturnDate).date().null())
                    .col(timestamp_column(Trips::CreatedAt))
                    .col(timestamp_column(Trips::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trips_agency")
                    .table(Trips::Table)
                    .col(Trips::AgencyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Itineraries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Itineraries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Itineraries::TripId).uuid().not_null())
                    .col(ColumnDef::new(Itineraries::AgencyId).uuid().not_null())
                    .col(ColumnDef::new(Itineraries::Name).string().not_null())
                    .col(
                        ColumnDef::new(Itineraries::SequenceOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp_column(Itineraries::CreatedAt))
                    .col(timestamp_column(Itineraries::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_itineraries_trip")
                            .from(Itineraries::Table, Itineraries::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_itineraries_trip")
                    .table(Itineraries::Table)
                    .col(Itineraries::TripId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ItineraryDays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItineraryDays::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ItineraryDays::ItineraryId).uuid().not_null())
                    .col(ColumnDef::new(ItineraryDays::AgencyId).uuid().not_null())
                    .col(ColumnDef::new(ItineraryDays::DayNumber).integer().not_null())
                    .col(ColumnDef::new(ItineraryDays::Date).date().null())
                    .col(timestamp_column(ItineraryDays::CreatedAt))
                    .col(timestamp_column(ItineraryDays::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_itinerary_days_itinerary")
                            .from(ItineraryDays::Table, ItineraryDays::ItineraryId)
                            .to(Itineraries::Table, Itineraries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_itinerary_days_itinerary")
                    .table(ItineraryDays::Table)
                    .col(ItineraryDays::ItineraryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ItineraryActivities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItineraryActivities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ItineraryActivities::ItineraryDayId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ItineraryActivities::AgencyId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ItineraryActivities::Name)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ItineraryActivities::ActivityType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ItineraryActivities::SequenceOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp_column(ItineraryActivities::CreatedAt))
                    .col(timestamp_column(ItineraryActivities::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_itinerary_activities_day")
                            .from(
                                ItineraryActivities::Table,
                                ItineraryActivities::ItineraryDayId,
                            )
                            .to(ItineraryDays::Table, ItineraryDays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_itinerary_activities_day")
                    .table(ItineraryActivities::Table)
                    .col(ItineraryActivities::ItineraryDayId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActivityPricing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityPricing::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ActivityPricing::ActivityId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ActivityPricing::AgencyId).uuid().not_null())
                    .col(
                        ColumnDef::new(ActivityPricing::TotalPriceCents)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ActivityPricing::Currency)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(timestamp_column(ActivityPricing::CreatedAt))
                    .col(timestamp_column(ActivityPricing::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_pricing_activity")
                            .from(ActivityPricing::Table, ActivityPricing::ActivityId)
                            .to(ItineraryActivities::Table, ItineraryActivities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityPricing::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ItineraryActivities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ItineraryDays::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Itineraries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await
    }
}

/// `created_at`/`updated_at` style column.
fn timestamp_column<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Trips {
    Table,
    Id,
    AgencyId,
    Name,
    DepartureDate,
    ReturnDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Itineraries {
    Table,
    Id,
    TripId,
    AgencyId,
    Name,
    SequenceOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ItineraryDays {
    Table,
    Id,
    ItineraryId,
    AgencyId,
    DayNumber,
    Date,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ItineraryActivities {
    Table,
    Id,
    ItineraryDayId,
    AgencyId,
    Name,
    ActivityType,
    SequenceOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ActivityPricing {
    Table,
    Id,
    ActivityId,
    AgencyId,
    TotalPriceCents,
    Currency,
    CreatedAt,
    UpdatedAt,
}
