//! Payment schedule repository.
//!
//! A schedule is one `payment_schedule_configs` row per priced activity, its
//! expected payment items and an optional credit-card guarantee. All
//! validation runs before the database transaction opens; inside it the only
//! failures are storage failures, plus the unique-constraint conflict when two
//! writers race to create the same schedule.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;
use wayfare_core::audit::{Actor, AuditAction, AuditEntityType, AuditEntry};
use wayfare_core::calc::{saturate_cents, sum_cents};
use wayfare_core::payments::PaymentStatus;
use wayfare_core::schedule::{
    AppliedSchedule, ApplyTemplateInput, CreateScheduleInput, DepositSpec, ExpectedItemInput,
    ExpectedPaymentItem, GuaranteeInput, ItemPatch, PaymentSchedule, PricedActivity,
    ResolvedItem, ScheduleError, ScheduleService, ScheduleSettings, TemplateApplication,
    UpdateScheduleInput,
};
use wayfare_core::tico::{TicoRules, TicoValidator};
use wayfare_shared::AppError;

use super::activity_pricing::{ActivityPricingRepository, PricedActivityLookup};
use super::convert;
use super::payment_transaction::{find_item, lock_item, sync_item_cache};
use super::template::find_template;
use crate::audit::AuditSink;
use crate::entities::sea_orm_active_enums::PaymentStatus as DbPaymentStatus;
use crate::entities::{
    credit_card_guarantees, expected_payment_items, payment_schedule_configs,
    payment_transactions,
};

/// Error types for payment schedule operations.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleStoreError {
    /// Activity pricing not found (or owned by another agency).
    #[error("Activity pricing not found: {0}")]
    ActivityNotFound(Uuid),

    /// No schedule exists for the activity pricing.
    #[error("Payment schedule not found for activity pricing: {0}")]
    ScheduleNotFound(Uuid),

    /// Expected payment item not found (or owned by another agency).
    #[error("Expected payment item not found: {0}")]
    ItemNotFound(Uuid),

    /// Template not found, inactive, or owned by another agency.
    #[error("Template not found: {0}")]
    TemplateNotFound(Uuid),

    /// A schedule already exists for the activity pricing.
    #[error("Payment schedule already exists for activity pricing: {0}")]
    AlreadyExists(Uuid),

    /// The schedule has recorded transactions and cannot be deleted.
    #[error("Payment schedule for activity pricing {0} has recorded transactions")]
    HasTransactions(Uuid),

    /// Schedule or compliance validation failed.
    #[error(transparent)]
    Validation(#[from] ScheduleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ScheduleStoreError> for AppError {
    fn from(err: ScheduleStoreError) -> Self {
        match err {
            ScheduleStoreError::ActivityNotFound(id) => {
                Self::NotFound(format!("Activity pricing {id}"))
            }
            ScheduleStoreError::ScheduleNotFound(id) => {
                Self::NotFound(format!("Payment schedule for activity pricing {id}"))
            }
            ScheduleStoreError::ItemNotFound(id) => {
                Self::NotFound(format!("Expected payment item {id}"))
            }
            ScheduleStoreError::TemplateNotFound(id) => Self::NotFound(format!("Template {id}")),
            e @ (ScheduleStoreError::AlreadyExists(_) | ScheduleStoreError::HasTransactions(_)) => {
                Self::Conflict(e.to_string())
            }
            ScheduleStoreError::Validation(e) => e.into(),
            ScheduleStoreError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Item row to insert, from either inline input or a resolved template.
struct NewItem {
    sequence_order: i32,
    payment_name: String,
    expected_amount_cents: i64,
    due_date: Option<NaiveDate>,
}

impl NewItem {
    fn from_input(position: usize, input: &ExpectedItemInput) -> Self {
        Self {
            sequence_order: i32::try_from(position + 1).unwrap_or(i32::MAX),
            payment_name: input.payment_name.trim().to_string(),
            expected_amount_cents: input.expected_amount_cents,
            due_date: input.due_date,
        }
    }
}

impl From<&ResolvedItem> for NewItem {
    fn from(item: &ResolvedItem) -> Self {
        Self {
            sequence_order: item.sequence_order,
            payment_name: item.payment_name.clone(),
            expected_amount_cents: item.expected_amount_cents,
            due_date: Some(item.due_date),
        }
    }
}

/// Payment schedule repository.
#[derive(Clone)]
pub struct ScheduleRepository {
    db: DatabaseConnection,
    pricing: Arc<dyn PricedActivityLookup>,
    audit: Arc<dyn AuditSink>,
    validator: TicoValidator,
}

impl ScheduleRepository {
    /// Creates a new schedule repository with the default compliance rules.
    #[must_use]
    pub fn new(db: DatabaseConnection, audit: Arc<dyn AuditSink>) -> Self {
        let pricing = Arc::new(ActivityPricingRepository::new(db.clone()));
        Self {
            db,
            pricing,
            audit,
            validator: TicoValidator::default(),
        }
    }

    /// Replaces the compliance rules used when applying templates.
    #[must_use]
    pub const fn with_rules(mut self, rules: TicoRules) -> Self {
        self.validator = TicoValidator::new(rules);
        self
    }

    /// Replaces the priced activity lookup.
    #[must_use]
    pub fn with_pricing_lookup(mut self, pricing: Arc<dyn PricedActivityLookup>) -> Self {
        self.pricing = pricing;
        self
    }

    // ========================================================================
    // Schedule operations
    // ========================================================================

    /// Gets the schedule of an activity pricing.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleNotFound` if the activity pricing has no schedule in
    /// this agency.
    pub async fn get(
        &self,
        activity_pricing_id: Uuid,
        agency_id: Uuid,
    ) -> Result<PaymentSchedule, ScheduleStoreError> {
        let config = find_config(&self.db, activity_pricing_id)
            .await?
            .filter(|c| c.agency_id == agency_id)
            .ok_or(ScheduleStoreError::ScheduleNotFound(activity_pricing_id))?;
        Ok(load_schedule(&self.db, config).await?)
    }

    /// Creates the schedule of an activity pricing.
    ///
    /// Inline items must sum to the activity total. Compliance rules are not
    /// applied on this path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The activity pricing does not exist in this agency
    /// - Validation fails (missing total, deposit, guarantee, item sum)
    /// - A schedule already exists for the activity pricing
    /// - Database operation fails
    pub async fn create(
        &self,
        agency_id: Uuid,
        actor: &Actor,
        input: CreateScheduleInput,
    ) -> Result<PaymentSchedule, ScheduleStoreError> {
        let activity = self
            .load_activity(input.activity_pricing_id, agency_id)
            .await?;
        let settings = ScheduleService::validate_create(&input, &activity)?;

        if find_config(&self.db, activity.id).await?.is_some() {
            return Err(ScheduleStoreError::AlreadyExists(activity.id));
        }

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let config = insert_config(&txn, &activity, settings, None, actor.user_id, now)
            .await
            .map_err(|e| conflict_or_database(e, activity.id))?;

        if let Some(items) = &input.items {
            let rows = items
                .iter()
                .enumerate()
                .map(|(position, item)| NewItem::from_input(position, item));
            insert_items(&txn, &config, rows, now).await?;
        }
        if let Some(guarantee) = &input.guarantee {
            upsert_guarantee(&txn, config.id, guarantee, now).await?;
        }

        txn.commit().await?;

        let schedule = load_schedule(&self.db, config).await?;
        info!(
            config_id = %schedule.config.id,
            activity_pricing_id = %activity.id,
            schedule_type = ?schedule.config.schedule_type,
            item_count = schedule.items.len(),
            "Payment schedule created"
        );

        self.audit
            .append(
                AuditEntry::new(
                    AuditEntityType::Config,
                    schedule.config.id,
                    agency_id,
                    AuditAction::Created,
                    actor,
                )
                .with_new_values(&schedule),
            )
            .await;

        Ok(schedule)
    }

    /// Updates the schedule of an activity pricing.
    ///
    /// Unspecified fields keep their stored values. Supplying items replaces
    /// every existing item, together with its transactions and payment state.
    /// A supplied guarantee is updated in place or created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The activity pricing or its schedule does not exist in this agency
    /// - Validation fails
    /// - Database operation fails
    pub async fn update(
        &self,
        activity_pricing_id: Uuid,
        agency_id: Uuid,
        actor: &Actor,
        input: UpdateScheduleInput,
    ) -> Result<PaymentSchedule, ScheduleStoreError> {
        let activity = self.load_activity(activity_pricing_id, agency_id).await?;
        let existing = find_config(&self.db, activity_pricing_id)
            .await?
            .ok_or(ScheduleStoreError::ScheduleNotFound(activity_pricing_id))?;
        let before = load_schedule(&self.db, existing.clone()).await?;

        let settings = ScheduleService::validate_update(
            &before.config,
            before.guarantee.is_some(),
            &input,
            &activity,
        )?;

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let mut active: payment_schedule_configs::ActiveModel = existing.into();
        apply_settings(&mut active, settings);
        active.updated_at = Set(now.into());
        let config = active.update(&txn).await?;

        if let Some(items) = &input.items {
            let removed = delete_items(&txn, config.id).await?;
            let rows = items
                .iter()
                .enumerate()
                .map(|(position, item)| NewItem::from_input(position, item));
            insert_items(&txn, &config, rows, now).await?;
            info!(config_id = %config.id, removed, added = items.len(), "Replaced schedule items");
        }
        if let Some(guarantee) = &input.guarantee {
            upsert_guarantee(&txn, config.id, guarantee, now).await?;
        }

        txn.commit().await?;

        let schedule = load_schedule(&self.db, config).await?;
        info!(
            config_id = %schedule.config.id,
            activity_pricing_id = %activity_pricing_id,
            "Payment schedule updated"
        );

        self.audit
            .append(
                AuditEntry::new(
                    AuditEntityType::Config,
                    schedule.config.id,
                    agency_id,
                    AuditAction::Updated,
                    actor,
                )
                .with_old_values(&before)
                .with_new_values(&schedule),
            )
            .await;

        Ok(schedule)
    }

    /// Resolves a template against an activity and persists the result.
    ///
    /// The resolved items are checked against the compliance rules before
    /// anything is written; any blocking finding fails the whole operation.
    /// An existing schedule has its settings overwritten and its items
    /// replaced. Non-blocking findings are returned with the schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The activity pricing or the (active) template does not exist in this agency
    /// - The template is empty or the total does not match the activity
    /// - Compliance validation fails
    /// - A concurrent writer created the schedule first
    /// - Database operation fails
    pub async fn apply_template(
        &self,
        activity_pricing_id: Uuid,
        agency_id: Uuid,
        actor: &Actor,
        input: ApplyTemplateInput,
    ) -> Result<AppliedSchedule, ScheduleStoreError> {
        let activity = self.load_activity(activity_pricing_id, agency_id).await?;
        let template = find_template(&self.db, input.template_id, agency_id)
            .await?
            .filter(|t| t.is_active)
            .ok_or(ScheduleStoreError::TemplateNotFound(input.template_id))?;

        let today = Utc::now().date_naive();
        let application = TemplateApplication::new(&input, today);
        let plan = ScheduleService::plan_from_template(
            &template,
            &activity,
            &application,
            &self.validator,
            today,
        )?;

        for issue in &plan.report.warnings {
            warn!(
                activity_pricing_id = %activity.id,
                template_id = %template.id,
                code = issue.code.as_str(),
                message = %issue.message,
                "Compliance warning on template application"
            );
        }

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let template_ref = Some((template.id, template.version));
        let config = match find_config(&txn, activity.id).await? {
            Some(existing) => {
                delete_items(&txn, existing.id).await?;
                let mut active: payment_schedule_configs::ActiveModel = existing.into();
                apply_settings(&mut active, plan.settings);
                active.template_id = Set(Some(template.id));
                active.template_version = Set(Some(template.version));
                active.updated_at = Set(now.into());
                active.update(&txn).await?
            }
            None => insert_config(
                &txn,
                &activity,
                plan.settings,
                template_ref,
                actor.user_id,
                now,
            )
            .await
            .map_err(|e| conflict_or_database(e, activity.id))?,
        };

        insert_items(&txn, &config, plan.items.iter().map(NewItem::from), now).await?;

        txn.commit().await?;

        let schedule = load_schedule(&self.db, config).await?;
        info!(
            config_id = %schedule.config.id,
            activity_pricing_id = %activity.id,
            template_id = %template.id,
            template_version = template.version,
            item_count = schedule.items.len(),
            warnings = plan.report.warnings.len(),
            "Template applied to payment schedule"
        );

        self.audit
            .append(
                AuditEntry::new(
                    AuditEntityType::Config,
                    schedule.config.id,
                    agency_id,
                    AuditAction::TemplateApplied,
                    actor,
                )
                .with_new_values(&json!({
                    "template_id": template.id,
                    "template_version": template.version,
                    "item_count": schedule.items.len(),
                    "total_amount_cents": application.total_amount_cents,
                    "departure_date": application.departure_date,
                })),
            )
            .await;

        Ok(AppliedSchedule {
            schedule,
            warnings: plan.report.warnings,
        })
    }

    /// Deletes a schedule with its items and guarantee.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The schedule does not exist in this agency
    /// - Any item has recorded transactions
    /// - Database operation fails
    pub async fn delete(
        &self,
        activity_pricing_id: Uuid,
        agency_id: Uuid,
        actor: &Actor,
    ) -> Result<(), ScheduleStoreError> {
        let config = find_config(&self.db, activity_pricing_id)
            .await?
            .filter(|c| c.agency_id == agency_id)
            .ok_or(ScheduleStoreError::ScheduleNotFound(activity_pricing_id))?;
        let schedule = load_schedule(&self.db, config.clone()).await?;

        let item_ids: Vec<Uuid> = schedule.items.iter().map(|item| item.id).collect();
        if !item_ids.is_empty() {
            let transactions = payment_transactions::Entity::find()
                .filter(payment_transactions::Column::ExpectedPaymentItemId.is_in(item_ids))
                .count(&self.db)
                .await?;
            if transactions > 0 {
                return Err(ScheduleStoreError::HasTransactions(activity_pricing_id));
            }
        }

        let txn = self.db.begin().await?;
        credit_card_guarantees::Entity::delete_many()
            .filter(credit_card_guarantees::Column::PaymentScheduleConfigId.eq(config.id))
            .exec(&txn)
            .await?;
        delete_items(&txn, config.id).await?;
        payment_schedule_configs::Entity::delete_by_id(config.id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(
            config_id = %config.id,
            activity_pricing_id = %activity_pricing_id,
            "Payment schedule deleted"
        );

        self.audit
            .append(
                AuditEntry::new(
                    AuditEntityType::Config,
                    config.id,
                    agency_id,
                    AuditAction::Deleted,
                    actor,
                )
                .with_old_values(&schedule),
            )
            .await;

        Ok(())
    }

    // ========================================================================
    // Item operations
    // ========================================================================

    /// Patches a single expected item.
    ///
    /// An amount change must keep the schedule summing to the activity total.
    /// The item's cached status is re-derived from its transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The item or its activity pricing does not exist in this agency
    /// - Validation fails
    /// - Database operation fails
    pub async fn update_item(
        &self,
        item_id: Uuid,
        agency_id: Uuid,
        actor: &Actor,
        patch: ItemPatch,
    ) -> Result<ExpectedPaymentItem, ScheduleStoreError> {
        let model = find_item(&self.db, item_id, agency_id)
            .await?
            .ok_or(ScheduleStoreError::ItemNotFound(item_id))?;
        let config = payment_schedule_configs::Entity::find_by_id(model.payment_schedule_config_id)
            .one(&self.db)
            .await?
            .ok_or(ScheduleStoreError::ItemNotFound(item_id))?;
        let activity = self
            .load_activity(config.activity_pricing_id, agency_id)
            .await?;

        let schedule_sum = expected_payment_items::Entity::find()
            .select_only()
            .column(expected_payment_items::Column::ExpectedAmountCents)
            .filter(expected_payment_items::Column::PaymentScheduleConfigId.eq(config.id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;
        let schedule_sum = saturate_cents(sum_cents(schedule_sum));

        let before = convert::item(model);
        ScheduleService::validate_item_patch(&before, &patch, schedule_sum, &activity)?;

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let locked = lock_item(&txn, item_id, agency_id)
            .await?
            .ok_or(ScheduleStoreError::ItemNotFound(item_id))?;
        let mut active: expected_payment_items::ActiveModel = locked.into();
        if let Some(name) = &patch.payment_name {
            active.payment_name = Set(name.trim().to_string());
        }
        if let Some(due_date) = patch.due_date {
            active.due_date = Set(due_date);
        }
        if let Some(amount) = patch.expected_amount_cents {
            active.expected_amount_cents = Set(amount);
        }
        active.updated_at = Set(now.into());
        let updated = active.update(&txn).await?;
        let updated = sync_item_cache(&txn, updated, now.date_naive()).await?;

        txn.commit().await?;

        let item = convert::item(updated);
        info!(item_id = %item_id, status = ?item.status, "Expected payment item updated");

        self.audit
            .append(
                AuditEntry::new(
                    AuditEntityType::Item,
                    item_id,
                    agency_id,
                    AuditAction::Updated,
                    actor,
                )
                .with_old_values(&before)
                .with_new_values(&item),
            )
            .await;

        Ok(item)
    }

    /// Sets an item's status explicitly.
    ///
    /// The next transaction write or resync re-derives the status again.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item does not exist in this agency.
    pub async fn update_item_status(
        &self,
        item_id: Uuid,
        agency_id: Uuid,
        actor: &Actor,
        status: PaymentStatus,
    ) -> Result<ExpectedPaymentItem, ScheduleStoreError> {
        let model = find_item(&self.db, item_id, agency_id)
            .await?
            .ok_or(ScheduleStoreError::ItemNotFound(item_id))?;
        let previous: PaymentStatus = model.status.into();

        let mut active: expected_payment_items::ActiveModel = model.into();
        active.status = Set(DbPaymentStatus::from(status));
        active.updated_at = Set(Utc::now().into());
        let item = convert::item(active.update(&self.db).await?);

        info!(
            item_id = %item_id,
            from = ?previous,
            to = ?status,
            "Expected payment item status changed"
        );

        self.audit
            .append(
                AuditEntry::new(
                    AuditEntityType::Item,
                    item_id,
                    agency_id,
                    AuditAction::StatusChanged,
                    actor,
                )
                .with_old_values(&json!({ "status": previous }))
                .with_new_values(&json!({ "status": status })),
            )
            .await;

        Ok(item)
    }

    async fn load_activity(
        &self,
        activity_pricing_id: Uuid,
        agency_id: Uuid,
    ) -> Result<PricedActivity, ScheduleStoreError> {
        self.pricing
            .find_priced_activity(activity_pricing_id)
            .await?
            .filter(|activity| activity.agency_id == agency_id)
            .ok_or(ScheduleStoreError::ActivityNotFound(activity_pricing_id))
    }
}

// ============================================================================
// Helpers usable inside a transaction
// ============================================================================

fn conflict_or_database(err: DbErr, activity_pricing_id: Uuid) -> ScheduleStoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            warn!(
                activity_pricing_id = %activity_pricing_id,
                "Lost race creating payment schedule"
            );
            ScheduleStoreError::AlreadyExists(activity_pricing_id)
        }
        _ => ScheduleStoreError::Database(err),
    }
}

async fn find_config<C: ConnectionTrait>(
    conn: &C,
    activity_pricing_id: Uuid,
) -> Result<Option<payment_schedule_configs::Model>, DbErr> {
    payment_schedule_configs::Entity::find()
        .filter(payment_schedule_configs::Column::ActivityPricingId.eq(activity_pricing_id))
        .one(conn)
        .await
}

async fn load_schedule<C: ConnectionTrait>(
    conn: &C,
    config: payment_schedule_configs::Model,
) -> Result<PaymentSchedule, DbErr> {
    let items = expected_payment_items::Entity::find()
        .filter(expected_payment_items::Column::PaymentScheduleConfigId.eq(config.id))
        .order_by_asc(expected_payment_items::Column::SequenceOrder)
        .all(conn)
        .await?;
    let guarantee = credit_card_guarantees::Entity::find()
        .filter(credit_card_guarantees::Column::PaymentScheduleConfigId.eq(config.id))
        .one(conn)
        .await?;

    Ok(PaymentSchedule {
        config: convert::config(config),
        items: items.into_iter().map(convert::item).collect(),
        guarantee: guarantee.map(convert::guarantee),
    })
}

fn apply_settings(active: &mut payment_schedule_configs::ActiveModel, settings: ScheduleSettings) {
    let deposit = settings.deposit;
    active.schedule_type = Set(settings.schedule_type.into());
    active.allow_partial_payments = Set(settings.allow_partial_payments);
    active.deposit_type = Set(deposit.map(|d| d.deposit_type().into()));
    active.deposit_percentage_bps = Set(deposit.and_then(|d| d.percentage_basis_points()));
    active.deposit_amount_cents = Set(match deposit {
        Some(DepositSpec::FixedAmount(cents)) => Some(cents),
        _ => None,
    });
}

async fn insert_config<C: ConnectionTrait>(
    conn: &C,
    activity: &PricedActivity,
    settings: ScheduleSettings,
    template: Option<(Uuid, i32)>,
    created_by: Uuid,
    now: DateTime<Utc>,
) -> Result<payment_schedule_configs::Model, DbErr> {
    let mut active = payment_schedule_configs::ActiveModel {
        id: Set(Uuid::new_v4()),
        activity_pricing_id: Set(activity.id),
        agency_id: Set(activity.agency_id),
        template_id: Set(template.map(|(id, _)| id)),
        template_version: Set(template.map(|(_, version)| version)),
        created_by: Set(created_by),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    apply_settings(&mut active, settings);
    active.insert(conn).await
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    config: &payment_schedule_configs::Model,
    items: impl Iterator<Item = NewItem>,
    now: DateTime<Utc>,
) -> Result<(), DbErr> {
    for item in items {
        expected_payment_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            payment_schedule_config_id: Set(config.id),
            agency_id: Set(config.agency_id),
            payment_name: Set(item.payment_name),
            expected_amount_cents: Set(item.expected_amount_cents),
            due_date: Set(item.due_date),
            sequence_order: Set(item.sequence_order),
            status: Set(DbPaymentStatus::Pending),
            paid_amount_cents: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

/// Deletes every item of a config together with the items' transactions.
async fn delete_items<C: ConnectionTrait>(conn: &C, config_id: Uuid) -> Result<u64, DbErr> {
    let item_ids: Vec<Uuid> = expected_payment_items::Entity::find()
        .select_only()
        .column(expected_payment_items::Column::Id)
        .filter(expected_payment_items::Column::PaymentScheduleConfigId.eq(config_id))
        .into_tuple()
        .all(conn)
        .await?;
    if item_ids.is_empty() {
        return Ok(0);
    }

    payment_transactions::Entity::delete_many()
        .filter(payment_transactions::Column::ExpectedPaymentItemId.is_in(item_ids))
        .exec(conn)
        .await?;
    let result = expected_payment_items::Entity::delete_many()
        .filter(expected_payment_items::Column::PaymentScheduleConfigId.eq(config_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

async fn upsert_guarantee<C: ConnectionTrait>(
    conn: &C,
    config_id: Uuid,
    input: &GuaranteeInput,
    now: DateTime<Utc>,
) -> Result<credit_card_guarantees::Model, DbErr> {
    let existing = credit_card_guarantees::Entity::find()
        .filter(credit_card_guarantees::Column::PaymentScheduleConfigId.eq(config_id))
        .one(conn)
        .await?;

    match existing {
        Some(model) => {
            let mut active: credit_card_guarantees::ActiveModel = model.into();
            fill_guarantee(&mut active, input, now);
            active.update(conn).await
        }
        None => {
            let mut active = credit_card_guarantees::ActiveModel {
                id: Set(Uuid::new_v4()),
                payment_schedule_config_id: Set(config_id),
                created_at: Set(now.into()),
                ..Default::default()
            };
            fill_guarantee(&mut active, input, now);
            active.insert(conn).await
        }
    }
}

fn fill_guarantee(
    active: &mut credit_card_guarantees::ActiveModel,
    input: &GuaranteeInput,
    now: DateTime<Utc>,
) {
    active.card_holder_name = Set(input.card_holder_name.trim().to_string());
    active.last_four = Set(input.last_four.clone());
    active.authorization_code = Set(input.authorization_code.clone());
    active.authorization_date = Set(input.authorization_date);
    active.authorization_amount_cents = Set(input.authorization_amount_cents);
    active.updated_at = Set(now.into());
}
