//! Audit sinks for payment schedule mutations.
//!
//! Repositories append an entry after their business transaction commits.
//! `append` has no error channel: a sink that cannot record an entry logs the
//! failure and returns, and the committed mutation stands.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::{info, warn};
use uuid::Uuid;
use wayfare_core::audit::AuditEntry;

use crate::entities::payment_audit_logs;

/// Destination for audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records `entry`. Never fails from the caller's point of view.
    async fn append(&self, entry: AuditEntry);
}

/// Writes entries to `payment_audit_logs`.
#[derive(Debug, Clone)]
pub struct DbAuditSink {
    db: DatabaseConnection,
}

impl DbAuditSink {
    /// Creates a sink writing through `db`.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditSink for DbAuditSink {
    async fn append(&self, entry: AuditEntry) {
        let request = entry.request.clone().unwrap_or_default();
        let row = payment_audit_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            entity_type: Set(entry.entity_type.as_str().to_string()),
            entity_id: Set(entry.entity_id),
            agency_id: Set(entry.agency_id),
            action: Set(entry.action.as_str().to_string()),
            old_values: Set(entry.old_values),
            new_values: Set(entry.new_values),
            performed_by: Set(entry.performed_by),
            ip_address: Set(request.ip_address),
            user_agent: Set(request.user_agent),
            request_id: Set(request.request_id),
            created_at: Set(entry.occurred_at.into()),
        };

        if let Err(e) = row.insert(&self.db).await {
            warn!(
                error = %e,
                entity_type = entry.entity_type.as_str(),
                entity_id = %entry.entity_id,
                action = entry.action.as_str(),
                "Failed to write audit log entry"
            );
        }
    }
}

/// Emits entries as structured log events instead of storing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn append(&self, entry: AuditEntry) {
        info!(
            target: "wayfare::audit",
            entity_type = entry.entity_type.as_str(),
            entity_id = %entry.entity_id,
            agency_id = %entry.agency_id,
            action = entry.action.as_str(),
            performed_by = %entry.performed_by,
            old_values = ?entry.old_values,
            new_values = ?entry.new_values,
            occurred_at = %entry.occurred_at,
            "audit"
        );
    }
}
