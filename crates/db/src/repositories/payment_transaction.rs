//! Payment transaction ledger.
//!
//! Every write recomputes the parent item's `paid_amount_cents` and `status`
//! from the item's full transaction set inside the same database transaction
//! as the write itself. The recomputation is a pure function of that set, so
//! re-running it is always safe. Writers lock the item row first, so two
//! concurrent writes on one item never each sum a set missing the other.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, warn};
use uuid::Uuid;
use wayfare_core::audit::{Actor, AuditAction, AuditEntityType, AuditEntry};
use wayfare_core::payments::{
    CreateTransactionInput, LedgerError, Movement, PaymentCacheService, PaymentTransaction,
    TransactionOutcome, validate_transaction,
};
use wayfare_core::schedule::{ExpectedPaymentItem, PricedActivity};
use wayfare_shared::AppError;

use super::activity_pricing::{ActivityPricingRepository, PricedActivityLookup};
use super::convert;
use crate::audit::AuditSink;
use crate::entities::sea_orm_active_enums::PaymentStatus;
use crate::entities::{expected_payment_items, payment_schedule_configs, payment_transactions};

/// Error types for transaction ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentTransactionError {
    /// Transaction not found (or owned by another agency).
    #[error("Payment transaction not found: {0}")]
    NotFound(Uuid),

    /// Expected payment item not found (or owned by another agency).
    #[error("Expected payment item not found: {0}")]
    ItemNotFound(Uuid),

    /// Amount, currency or ownership check failed.
    #[error(transparent)]
    Validation(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PaymentTransactionError> for AppError {
    fn from(err: PaymentTransactionError) -> Self {
        match err {
            PaymentTransactionError::NotFound(id) => {
                Self::NotFound(format!("Payment transaction {id}"))
            }
            PaymentTransactionError::ItemNotFound(id) => {
                Self::NotFound(format!("Expected payment item {id}"))
            }
            PaymentTransactionError::Validation(e) => e.into(),
            PaymentTransactionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Payment transaction repository.
#[derive(Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
    pricing: Arc<dyn PricedActivityLookup>,
    audit: Arc<dyn AuditSink>,
}

impl TransactionRepository {
    /// Creates a new transaction repository reading prices from `db`.
    #[must_use]
    pub fn new(db: DatabaseConnection, audit: Arc<dyn AuditSink>) -> Self {
        let pricing = Arc::new(ActivityPricingRepository::new(db.clone()));
        Self { db, pricing, audit }
    }

    /// Replaces the priced activity lookup.
    #[must_use]
    pub fn with_pricing_lookup(mut self, pricing: Arc<dyn PricedActivityLookup>) -> Self {
        self.pricing = pricing;
        self
    }

    /// Records a payment, refund or adjustment against an item.
    ///
    /// The insert and the item's cache refresh commit together.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The item does not exist in this agency
    /// - The amount is negative
    /// - The currency differs from the activity's currency
    /// - The item's activity pricing cannot be resolved
    /// - Database operation fails
    pub async fn create(
        &self,
        agency_id: Uuid,
        actor: &Actor,
        input: CreateTransactionInput,
    ) -> Result<TransactionOutcome, PaymentTransactionError> {
        let item_id = input.expected_payment_item_id;
        let item = find_item(&self.db, item_id, agency_id)
            .await?
            .ok_or(PaymentTransactionError::ItemNotFound(item_id))?;

        let activity = self.resolve_activity(&item).await?;
        validate_transaction(&input, item.id, activity.as_ref())?;

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let item = lock_item(&txn, item_id, agency_id)
            .await?
            .ok_or(PaymentTransactionError::ItemNotFound(item_id))?;

        let model = payment_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            expected_payment_item_id: Set(item.id),
            agency_id: Set(item.agency_id),
            transaction_type: Set(input.transaction_type.into()),
            amount_cents: Set(input.amount_cents),
            currency: Set(input.currency.to_string()),
            payment_method: Set(input.payment_method),
            reference_number: Set(input.reference_number),
            transaction_date: Set(input.transaction_date),
            notes: Set(input.notes),
            created_by: Set(actor.user_id),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        let item = sync_item_cache(&txn, item, now.date_naive()).await?;

        txn.commit().await?;

        let transaction = convert::transaction(model)?;
        let item = convert::item(item);
        info!(
            transaction_id = %transaction.id,
            item_id = %item.id,
            transaction_type = ?transaction.transaction_type,
            amount_cents = transaction.amount_cents,
            paid_amount_cents = item.paid_amount_cents,
            status = ?item.status,
            "Payment transaction recorded"
        );

        self.audit
            .append(
                AuditEntry::new(
                    AuditEntityType::Transaction,
                    transaction.id,
                    agency_id,
                    AuditAction::Created,
                    actor,
                )
                .with_new_values(&transaction),
            )
            .await;

        Ok(TransactionOutcome { transaction, item })
    }

    /// Deletes a transaction and refreshes its former item.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transaction does not exist in this agency.
    pub async fn delete(
        &self,
        id: Uuid,
        agency_id: Uuid,
        actor: &Actor,
    ) -> Result<TransactionOutcome, PaymentTransactionError> {
        let txn = self.db.begin().await?;

        let model = payment_transactions::Entity::find_by_id(id)
            .filter(payment_transactions::Column::AgencyId.eq(agency_id))
            .one(&txn)
            .await?
            .ok_or(PaymentTransactionError::NotFound(id))?;
        let item_id = model.expected_payment_item_id;

        let item = lock_item(&txn, item_id, agency_id)
            .await?
            .ok_or(PaymentTransactionError::ItemNotFound(item_id))?;
        model.clone().delete(&txn).await?;
        let item = sync_item_cache(&txn, item, Utc::now().date_naive()).await?;

        txn.commit().await?;

        let transaction = convert::transaction(model)?;
        let item = convert::item(item);
        info!(
            transaction_id = %id,
            item_id = %item.id,
            paid_amount_cents = item.paid_amount_cents,
            status = ?item.status,
            "Payment transaction deleted"
        );

        self.audit
            .append(
                AuditEntry::new(
                    AuditEntityType::Transaction,
                    id,
                    agency_id,
                    AuditAction::Deleted,
                    actor,
                )
                .with_old_values(&transaction),
            )
            .await;

        Ok(TransactionOutcome { transaction, item })
    }

    /// Gets a transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the transaction does not exist in this agency.
    pub async fn get(
        &self,
        id: Uuid,
        agency_id: Uuid,
    ) -> Result<PaymentTransaction, PaymentTransactionError> {
        let model = payment_transactions::Entity::find_by_id(id)
            .filter(payment_transactions::Column::AgencyId.eq(agency_id))
            .one(&self.db)
            .await?
            .ok_or(PaymentTransactionError::NotFound(id))?;
        Ok(convert::transaction(model)?)
    }

    /// Lists an item's transactions by transaction date, then creation time.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item does not exist in this agency.
    pub async fn list_for_item(
        &self,
        item_id: Uuid,
        agency_id: Uuid,
    ) -> Result<Vec<PaymentTransaction>, PaymentTransactionError> {
        find_item(&self.db, item_id, agency_id)
            .await?
            .ok_or(PaymentTransactionError::ItemNotFound(item_id))?;

        let models = payment_transactions::Entity::find()
            .filter(payment_transactions::Column::ExpectedPaymentItemId.eq(item_id))
            .order_by_asc(payment_transactions::Column::TransactionDate)
            .order_by_asc(payment_transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models
            .into_iter()
            .map(|m| convert::transaction(m).map_err(Into::into))
            .collect()
    }

    /// Recomputes an item's cached paid amount and status.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item does not exist in this agency.
    pub async fn resync_item(
        &self,
        item_id: Uuid,
        agency_id: Uuid,
    ) -> Result<ExpectedPaymentItem, PaymentTransactionError> {
        let txn = self.db.begin().await?;
        let item = lock_item(&txn, item_id, agency_id)
            .await?
            .ok_or(PaymentTransactionError::ItemNotFound(item_id))?;
        let item = sync_item_cache(&txn, item, Utc::now().date_naive()).await?;
        txn.commit().await?;
        Ok(convert::item(item))
    }

    /// Walks item → config → activity pricing.
    ///
    /// A broken link is logged and reported as `None`.
    async fn resolve_activity(
        &self,
        item: &expected_payment_items::Model,
    ) -> Result<Option<PricedActivity>, DbErr> {
        let Some(config) = payment_schedule_configs::Entity::find_by_id(item.payment_schedule_config_id)
            .one(&self.db)
            .await?
        else {
            warn!(
                item_id = %item.id,
                config_id = %item.payment_schedule_config_id,
                "Expected payment item has no schedule config"
            );
            return Ok(None);
        };

        let activity = self
            .pricing
            .find_priced_activity(config.activity_pricing_id)
            .await?;
        if activity.is_none() {
            warn!(
                item_id = %item.id,
                activity_pricing_id = %config.activity_pricing_id,
                "Schedule config points at missing activity pricing"
            );
        }
        Ok(activity)
    }
}

// ============================================================================
// Cache synchronization
// ============================================================================

/// Finds an item within an agency.
pub(crate) async fn find_item<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
    agency_id: Uuid,
) -> Result<Option<expected_payment_items::Model>, DbErr> {
    expected_payment_items::Entity::find_by_id(item_id)
        .filter(expected_payment_items::Column::AgencyId.eq(agency_id))
        .one(conn)
        .await
}

/// Finds an item within an agency and takes a row lock on it.
///
/// The lock is held until `conn` commits. Backends without row locks
/// (SQLite) serialize writers at the database level instead.
pub(crate) async fn lock_item<C: ConnectionTrait>(
    conn: &C,
    item_id: Uuid,
    agency_id: Uuid,
) -> Result<Option<expected_payment_items::Model>, DbErr> {
    expected_payment_items::Entity::find_by_id(item_id)
        .filter(expected_payment_items::Column::AgencyId.eq(agency_id))
        .lock_exclusive()
        .one(conn)
        .await
}

/// Recomputes `paid_amount_cents` and `status` from the item's transactions.
///
/// Run this on the same transaction as the write that changed the set,
/// after [`lock_item`] on that transaction.
pub(crate) async fn sync_item_cache<C: ConnectionTrait>(
    conn: &C,
    item: expected_payment_items::Model,
    today: NaiveDate,
) -> Result<expected_payment_items::Model, DbErr> {
    let movements: Vec<Movement> = payment_transactions::Entity::find()
        .filter(payment_transactions::Column::ExpectedPaymentItemId.eq(item.id))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| Movement {
            transaction_type: t.transaction_type.into(),
            amount_cents: t.amount_cents,
        })
        .collect();

    let state = PaymentCacheService::recompute(
        item.expected_amount_cents,
        item.due_date,
        &movements,
        today,
    );
    let status = PaymentStatus::from(state.status);

    debug!(
        item_id = %item.id,
        transactions = movements.len(),
        paid_amount_cents = state.paid_amount_cents,
        status = ?state.status,
        "Recomputed payment cache"
    );

    if item.paid_amount_cents == state.paid_amount_cents && item.status == status {
        return Ok(item);
    }

    let mut active: expected_payment_items::ActiveModel = item.into();
    active.paid_amount_cents = Set(state.paid_amount_cents);
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    active.update(conn).await
}
