//! Payment schedule template repository.
//!
//! Templates are agency-scoped. A template from another agency is reported as
//! not found. At most one active template per agency is the default: writes
//! that set `is_default` clear the flag on every other template of the agency
//! inside the same transaction.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;
use wayfare_core::audit::{Actor, AuditAction, AuditEntityType, AuditEntry};
use wayfare_core::template::{
    CreateTemplateInput, PaymentScheduleTemplate, TemplateError, TemplateItem, TemplateService,
    UpdateTemplateInput,
};
use wayfare_shared::AppError;

use super::convert;
use crate::audit::AuditSink;
use crate::entities::{payment_schedule_template_items, payment_schedule_templates};

/// Error types for template operations.
#[derive(Debug, thiserror::Error)]
pub enum TemplateStoreError {
    /// Template not found (or owned by another agency).
    #[error("Template not found: {0}")]
    NotFound(Uuid),

    /// Invalid name or item set.
    #[error(transparent)]
    Validation(#[from] TemplateError),

    /// A concurrent write made another template the agency default.
    #[error("Agency {0} already has a default template")]
    DefaultConflict(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TemplateStoreError> for AppError {
    fn from(err: TemplateStoreError) -> Self {
        match err {
            TemplateStoreError::NotFound(id) => Self::NotFound(format!("Template {id}")),
            TemplateStoreError::Validation(e) => e.into(),
            TemplateStoreError::DefaultConflict(agency_id) => {
                Self::Conflict(format!("Agency {agency_id} already has a default template"))
            }
            TemplateStoreError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Template repository.
#[derive(Clone)]
pub struct TemplateRepository {
    db: DatabaseConnection,
    audit: Arc<dyn AuditSink>,
}

impl TemplateRepository {
    /// Creates a new template repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, audit: Arc<dyn AuditSink>) -> Self {
        Self { db, audit }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Lists an agency's templates, default first, then by name.
    ///
    /// Inactive templates are only included when `include_inactive` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        agency_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<PaymentScheduleTemplate>, TemplateStoreError> {
        let mut query = payment_schedule_templates::Entity::find()
            .filter(payment_schedule_templates::Column::AgencyId.eq(agency_id));
        if !include_inactive {
            query = query.filter(payment_schedule_templates::Column::IsActive.eq(true));
        }
        let templates = query
            .order_by_desc(payment_schedule_templates::Column::IsDefault)
            .order_by_asc(payment_schedule_templates::Column::Name)
            .all(&self.db)
            .await?;

        let ids: Vec<Uuid> = templates.iter().map(|t| t.id).collect();
        let mut items = load_items(&self.db, &ids).await?;

        Ok(templates
            .into_iter()
            .map(|model| {
                let template_items = items.remove(&model.id).unwrap_or_default();
                to_template(model, template_items)
            })
            .collect())
    }

    /// Gets a template with its items.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the template does not exist in this agency.
    pub async fn get(
        &self,
        id: Uuid,
        agency_id: Uuid,
    ) -> Result<PaymentScheduleTemplate, TemplateStoreError> {
        find_template(&self.db, id, agency_id)
            .await?
            .ok_or(TemplateStoreError::NotFound(id))
    }

    /// Gets the agency's active default template, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_default(
        &self,
        agency_id: Uuid,
    ) -> Result<Option<PaymentScheduleTemplate>, TemplateStoreError> {
        let Some(model) = payment_schedule_templates::Entity::find()
            .filter(payment_schedule_templates::Column::AgencyId.eq(agency_id))
            .filter(payment_schedule_templates::Column::IsDefault.eq(true))
            .filter(payment_schedule_templates::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut items = load_items(&self.db, &[model.id]).await?;
        let template_items = items.remove(&model.id).unwrap_or_default();
        Ok(Some(to_template(model, template_items)))
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Creates a template with its items.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is blank or the item set is invalid
    /// - Database operation fails
    pub async fn create(
        &self,
        agency_id: Uuid,
        actor: &Actor,
        input: CreateTemplateInput,
    ) -> Result<PaymentScheduleTemplate, TemplateStoreError> {
        let name = TemplateService::normalize_name(&input.name)?;
        let items = TemplateService::validate_items(&input.items)?;

        let now = Utc::now();
        let template_id = Uuid::new_v4();

        let txn = self.db.begin().await?;

        if input.is_default {
            clear_other_defaults(&txn, agency_id, template_id, now).await?;
        }

        let model = payment_schedule_templates::ActiveModel {
            id: Set(template_id),
            agency_id: Set(agency_id),
            name: Set(name),
            description: Set(input.description),
            schedule_type: Set(input.schedule_type.into()),
            is_default: Set(input.is_default),
            is_active: Set(true),
            version: Set(1),
            created_by: Set(actor.user_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| default_conflict_or_database(e, agency_id))?;

        insert_items(&txn, template_id, &items, now).await?;

        txn.commit().await?;

        let template = to_template(model, items);
        info!(
            template_id = %template.id,
            agency_id = %agency_id,
            item_count = template.items.len(),
            is_default = template.is_default,
            "Payment schedule template created"
        );

        self.audit
            .append(
                AuditEntry::new(
                    AuditEntityType::Template,
                    template.id,
                    agency_id,
                    AuditAction::Created,
                    actor,
                )
                .with_new_values(&template),
            )
            .await;

        Ok(template)
    }

    /// Applies a partial update to a template.
    ///
    /// Replacing the items bumps the version; metadata-only updates do not.
    /// Deactivating a template also clears its default flag.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The template does not exist in this agency
    /// - The new name or item set is invalid
    /// - Database operation fails
    pub async fn update(
        &self,
        id: Uuid,
        agency_id: Uuid,
        actor: &Actor,
        input: UpdateTemplateInput,
    ) -> Result<PaymentScheduleTemplate, TemplateStoreError> {
        let name = input
            .name
            .as_deref()
            .map(TemplateService::normalize_name)
            .transpose()?;
        let new_items = input
            .items
            .as_deref()
            .map(TemplateService::validate_items)
            .transpose()?;

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let before = find_template(&txn, id, agency_id)
            .await?
            .ok_or(TemplateStoreError::NotFound(id))?;

        let is_active = input.is_active.unwrap_or(before.is_active);
        let is_default = input.is_default.unwrap_or(before.is_default) && is_active;
        if is_default && !before.is_default {
            clear_other_defaults(&txn, agency_id, id, now).await?;
        }

        let model = payment_schedule_templates::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(TemplateStoreError::NotFound(id))?;
        let mut active: payment_schedule_templates::ActiveModel = model.into();

        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(schedule_type) = input.schedule_type {
            active.schedule_type = Set(schedule_type.into());
        }
        active.is_active = Set(is_active);
        active.is_default = Set(is_default);
        if new_items.is_some() {
            active.version = Set(before.version + 1);
        }
        active.updated_at = Set(now.into());

        let model = active
            .update(&txn)
            .await
            .map_err(|e| default_conflict_or_database(e, agency_id))?;

        let items = match new_items {
            Some(items) => {
                payment_schedule_template_items::Entity::delete_many()
                    .filter(payment_schedule_template_items::Column::TemplateId.eq(id))
                    .exec(&txn)
                    .await?;
                insert_items(&txn, id, &items, now).await?;
                items
            }
            None => before.items.clone(),
        };

        txn.commit().await?;

        let template = to_template(model, items);
        let items_replaced = input.items.is_some();
        info!(
            template_id = %id,
            agency_id = %agency_id,
            version = template.version,
            items_replaced,
            "Payment schedule template updated"
        );

        let new_values = if items_replaced {
            json!({
                "template": &template,
                "item_count": template.items.len(),
                "version": template.version,
            })
        } else {
            json!(&template)
        };
        self.audit
            .append(
                AuditEntry::new(
                    AuditEntityType::Template,
                    id,
                    agency_id,
                    AuditAction::Updated,
                    actor,
                )
                .with_old_values(&before)
                .with_new_values(&new_values),
            )
            .await;

        Ok(template)
    }

    /// Deactivates a template and clears its default flag.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the template does not exist in this agency.
    pub async fn soft_delete(
        &self,
        id: Uuid,
        agency_id: Uuid,
        actor: &Actor,
    ) -> Result<(), TemplateStoreError> {
        let model = payment_schedule_templates::Entity::find_by_id(id)
            .filter(payment_schedule_templates::Column::AgencyId.eq(agency_id))
            .one(&self.db)
            .await?
            .ok_or(TemplateStoreError::NotFound(id))?;

        let old_values = json!({
            "name": &model.name,
            "is_default": model.is_default,
            "is_active": model.is_active,
            "version": model.version,
        });

        let mut active: payment_schedule_templates::ActiveModel = model.into();
        active.is_active = Set(false);
        active.is_default = Set(false);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        info!(template_id = %id, agency_id = %agency_id, "Payment schedule template deactivated");

        self.audit
            .append(
                AuditEntry::new(
                    AuditEntityType::Template,
                    id,
                    agency_id,
                    AuditAction::Deleted,
                    actor,
                )
                .with_old_values(&old_values)
                .with_new_values(&json!({ "is_active": false, "is_default": false })),
            )
            .await;

        Ok(())
    }
}

// ============================================================================
// Helpers usable inside a transaction
// ============================================================================

/// Loads a template of `agency_id` with its items.
pub(crate) async fn find_template<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    agency_id: Uuid,
) -> Result<Option<PaymentScheduleTemplate>, DbErr> {
    let Some(model) = payment_schedule_templates::Entity::find_by_id(id)
        .filter(payment_schedule_templates::Column::AgencyId.eq(agency_id))
        .one(conn)
        .await?
    else {
        return Ok(None);
    };

    let mut items = load_items(conn, &[id]).await?;
    let template_items = items.remove(&id).unwrap_or_default();
    Ok(Some(to_template(model, template_items)))
}

/// Loads items for several templates in one query, grouped by template.
async fn load_items<C: ConnectionTrait>(
    conn: &C,
    template_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<TemplateItem>>, DbErr> {
    if template_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = payment_schedule_template_items::Entity::find()
        .filter(payment_schedule_template_items::Column::TemplateId.is_in(template_ids.to_vec()))
        .order_by_asc(payment_schedule_template_items::Column::SequenceOrder)
        .all(conn)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<TemplateItem>> = HashMap::new();
    for row in rows {
        let template_id = row.template_id;
        grouped
            .entry(template_id)
            .or_default()
            .push(convert::template_item(row)?);
    }
    Ok(grouped)
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    template_id: Uuid,
    items: &[TemplateItem],
    now: DateTime<Utc>,
) -> Result<(), DbErr> {
    for item in items {
        payment_schedule_template_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            template_id: Set(template_id),
            sequence_order: Set(item.sequence_order),
            payment_name: Set(item.payment_name.clone()),
            percentage_bps: Set(item.amount.percentage_basis_points()),
            fixed_amount_cents: Set(item.amount.fixed_cents()),
            days_from_booking: Set(item.timing.days_from_booking().map(days_column)),
            days_before_departure: Set(item.timing.days_before_departure().map(days_column)),
            created_at: Set(now.into()),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

/// Offsets come from `i32` input, so they always fit.
fn days_column(days: u32) -> i32 {
    i32::try_from(days).unwrap_or(i32::MAX)
}

fn default_conflict_or_database(err: DbErr, agency_id: Uuid) -> TemplateStoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            warn!(agency_id = %agency_id, "Lost race setting default template");
            TemplateStoreError::DefaultConflict(agency_id)
        }
        _ => TemplateStoreError::Database(err),
    }
}

async fn clear_other_defaults<C: ConnectionTrait>(
    conn: &C,
    agency_id: Uuid,
    keep_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), DbErr> {
    let result = payment_schedule_templates::Entity::update_many()
        .col_expr(payment_schedule_templates::Column::IsDefault, Expr::value(false))
        .col_expr(
            payment_schedule_templates::Column::UpdatedAt,
            Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(now)),
        )
        .filter(payment_schedule_templates::Column::AgencyId.eq(agency_id))
        .filter(payment_schedule_templates::Column::IsDefault.eq(true))
        .filter(payment_schedule_templates::Column::Id.ne(keep_id))
        .exec(conn)
        .await?;

    if result.rows_affected > 0 {
        info!(agency_id = %agency_id, cleared = result.rows_affected, "Cleared previous default template");
    }
    Ok(())
}

fn to_template(
    model: payment_schedule_templates::Model,
    items: Vec<TemplateItem>,
) -> PaymentScheduleTemplate {
    PaymentScheduleTemplate {
        id: model.id,
        agency_id: model.agency_id,
        name: model.name,
        description: model.description,
        schedule_type: model.schedule_type.into(),
        is_default: model.is_default,
        is_active: model.is_active,
        version: model.version,
        created_by: model.created_by,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        items,
    }
}
