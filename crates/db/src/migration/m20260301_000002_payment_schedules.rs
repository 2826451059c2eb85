//! Creates the payment schedule tables.
//!
//! Templates and their items, schedule configs with expected items and
//! guarantees, and the transaction ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // TEMPLATES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(PaymentScheduleTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentScheduleTemplates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplates::AgencyId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplates::Name)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplates::Description)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplates::ScheduleType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplates::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplates::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplates::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplates::CreatedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(timestamp_column(PaymentScheduleTemplates::CreatedAt))
                    .col(timestamp_column(PaymentScheduleTemplates::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_schedule_templates_agency")
                    .table(PaymentScheduleTemplates::Table)
                    .col(PaymentScheduleTemplates::AgencyId)
                    .col(PaymentScheduleTemplates::IsActive)
                    .to_owned(),
            )
            .await?;

        // At most one default template per agency.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_payment_schedule_templates_default \
                 ON payment_schedule_templates (agency_id) WHERE is_default",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentScheduleTemplateItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentScheduleTemplateItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplateItems::TemplateId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplateItems::SequenceOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplateItems::PaymentName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplateItems::PercentageBps)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplateItems::FixedAmountCents)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplateItems::DaysFromBooking)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleTemplateItems::DaysBeforeDeparture)
                            .integer()
                            .null(),
                    )
                    .col(timestamp_column(PaymentScheduleTemplateItems::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_schedule_template_items_template")
                            .from(
                                PaymentScheduleTemplateItems::Table,
                                PaymentScheduleTemplateItems::TemplateId,
                            )
                            .to(PaymentScheduleTemplates::Table, PaymentScheduleTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_schedule_template_items_sequence")
                    .table(PaymentScheduleTemplateItems::Table)
                    .col(PaymentScheduleTemplateItems::TemplateId)
                    .col(PaymentScheduleTemplateItems::SequenceOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // SCHEDULES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(PaymentScheduleConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentScheduleConfigs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // One schedule per priced activity. Concurrent creates
                    // are decided here, not by the existence check.
                    .col(
                        ColumnDef::new(PaymentScheduleConfigs::ActivityPricingId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleConfigs::AgencyId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleConfigs::ScheduleType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleConfigs::AllowPartialPayments)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleConfigs::DepositType)
                            .string_len(16)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleConfigs::DepositPercentageBps)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleConfigs::DepositAmountCents)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleConfigs::TemplateId)
                            .uuid()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleConfigs::TemplateVersion)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentScheduleConfigs::CreatedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(timestamp_column(PaymentScheduleConfigs::CreatedAt))
                    .col(timestamp_column(PaymentScheduleConfigs::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_schedule_configs_pricing")
                            .from(
                                PaymentScheduleConfigs::Table,
                                PaymentScheduleConfigs::ActivityPricingId,
                            )
                            .to(ActivityPricing::Table, ActivityPricing::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_schedule_configs_template")
                            .from(
                                PaymentScheduleConfigs::Table,
                                PaymentScheduleConfigs::TemplateId,
                            )
                            .to(PaymentScheduleTemplates::Table, PaymentScheduleTemplates::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpectedPaymentItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpectedPaymentItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExpectedPaymentItems::PaymentScheduleConfigId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpectedPaymentItems::AgencyId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpectedPaymentItems::PaymentName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpectedPaymentItems::ExpectedAmountCents)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(ExpectedPaymentItems::ExpectedAmountCents).gte(0)),
                    )
                    .col(ColumnDef::new(ExpectedPaymentItems::DueDate).date().null())
                    .col(
                        ColumnDef::new(ExpectedPaymentItems::SequenceOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpectedPaymentItems::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(ExpectedPaymentItems::PaidAmountCents)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(ExpectedPaymentItems::PaidAmountCents).gte(0)),
                    )
                    .col(timestamp_column(ExpectedPaymentItems::CreatedAt))
                    .col(timestamp_column(ExpectedPaymentItems::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expected_payment_items_config")
                            .from(
                                ExpectedPaymentItems::Table,
                                ExpectedPaymentItems::PaymentScheduleConfigId,
                            )
                            .to(PaymentScheduleConfigs::Table, PaymentScheduleConfigs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_expected_payment_items_config")
                    .table(ExpectedPaymentItems::Table)
                    .col(ExpectedPaymentItems::PaymentScheduleConfigId)
                    .col(ExpectedPaymentItems::SequenceOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CreditCardGuarantees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreditCardGuarantees::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CreditCardGuarantees::PaymentScheduleConfigId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CreditCardGuarantees::CardHolderName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditCardGuarantees::LastFour)
                            .string_len(4)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreditCardGuarantees::AuthorizationCode)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CreditCardGuarantees::AuthorizationDate)
                            .date()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CreditCardGuarantees::AuthorizationAmountCents)
                            .big_integer()
                            .null(),
                    )
                    .col(timestamp_column(CreditCardGuarantees::CreatedAt))
                    .col(timestamp_column(CreditCardGuarantees::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_card_guarantees_config")
                            .from(
                                CreditCardGuarantees::Table,
                                CreditCardGuarantees::PaymentScheduleConfigId,
                            )
                            .to(PaymentScheduleConfigs::Table, PaymentScheduleConfigs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // TRANSACTIONS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(PaymentTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentTransactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::ExpectedPaymentItemId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::AgencyId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::TransactionType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::AmountCents)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(PaymentTransactions::AmountCents).gte(0)),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::Currency)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::PaymentMethod)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::ReferenceNumber)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTransactions::TransactionDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PaymentTransactions::Notes).text().null())
                    .col(
                        ColumnDef::new(PaymentTransactions::CreatedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(timestamp_column(PaymentTransactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_transactions_item")
                            .from(
                                PaymentTransactions::Table,
                                PaymentTransactions::ExpectedPaymentItemId,
                            )
                            .to(ExpectedPaymentItems::Table, ExpectedPaymentItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_transactions_item")
                    .table(PaymentTransactions::Table)
                    .col(PaymentTransactions::ExpectedPaymentItemId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreditCardGuarantees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpectedPaymentItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentScheduleConfigs::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(PaymentScheduleTemplateItems::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentScheduleTemplates::Table).to_owned())
            .await
    }
}

fn timestamp_column<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum PaymentScheduleTemplates {
    Table,
    Id,
    AgencyId,
    Name,
    Description,
    ScheduleType,
    IsDefault,
    IsActive,
    Version,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PaymentScheduleTemplateItems {
    Table,
    Id,
    TemplateId,
    SequenceOrder,
    PaymentName,
    PercentageBps,
    FixedAmountCents,
    DaysFromBooking,
    DaysBeforeDeparture,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentScheduleConfigs {
    Table,
    Id,
    ActivityPricingId,
    AgencyId,
    ScheduleType,
    AllowPartialPayments,
    DepositType,
    DepositPercentageBps,
    DepositAmountCents,
    TemplateId,
    TemplateVersion,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExpectedPaymentItems {
    Table,
    Id,
    PaymentScheduleConfigId,
    AgencyId,
    PaymentName,
    ExpectedAmountCents,
    DueDate,
    SequenceOrder,
    Status,
    PaidAmountCents,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CreditCardGuarantees {
    Table,
    Id,
    PaymentScheduleConfigId,
    CardHolderName,
    LastFour,
    AuthorizationCode,
    AuthorizationDate,
    AuthorizationAmountCents,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PaymentTransactions {
    Table,
    Id,
    ExpectedPaymentItemId,
    AgencyId,
    TransactionType,
    AmountCents,
    Currency,
    PaymentMethod,
    ReferenceNumber,
    TransactionDate,
    Notes,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ActivityPricing {
    Table,
    Id,
}
