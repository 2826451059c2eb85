//! Creates the append-only `payment_audit_logs` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentAuditLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentAuditLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentAuditLogs::EntityType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentAuditLogs::EntityId).uuid().not_null())
                    .col(ColumnDef::new(PaymentAuditLogs::AgencyId).uuid().not_null())
                    .col(
                        ColumnDef::new(PaymentAuditLogs::Action)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentAuditLogs::OldValues).json().null())
                    .col(ColumnDef::new(PaymentAuditLogs::NewValues).json().null())
                    .col(
                        ColumnDef::new(PaymentAuditLogs::PerformedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentAuditLogs::IpAddress).string().null())
                    .col(ColumnDef::new(PaymentAuditLogs::UserAgent).text().null())
                    .col(ColumnDef::new(PaymentAuditLogs::RequestId).string().null())
                    .col(
                        ColumnDef::new(PaymentAuditLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Entity history lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_payment_audit_logs_entity")
                    .table(PaymentAuditLogs::Table)
                    .col(PaymentAuditLogs::EntityType)
                    .col(PaymentAuditLogs::EntityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_audit_logs_agency")
                    .table(PaymentAuditLogs::Table)
                    .col(PaymentAuditLogs::AgencyId)
                    .col(PaymentAuditLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentAuditLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PaymentAuditLogs {
    Table,
    Id,
    EntityType,
    EntityId,
    AgencyId,
    Action,
    OldValues,
    NewValues,
    PerformedBy,
    IpAddress,
    UserAgent,
    RequestId,
    CreatedAt,
}
