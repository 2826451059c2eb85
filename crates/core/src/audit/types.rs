//! Audit log entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of entity an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntityType {
    /// Payment schedule template.
    Template,
    /// Payment schedule config.
    Config,
    /// Expected payment item.
    Item,
    /// Payment transaction.
    Transaction,
}

impl AuditEntityType {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Config => "config",
            Self::Item => "item",
            Self::Transaction => "transaction",
        }
    }
}

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Entity created.
    Created,
    /// Entity updated.
    Updated,
    /// Entity deleted (or soft-deleted).
    Deleted,
    /// Item status set explicitly.
    StatusChanged,
    /// Entity locked against edits.
    Locked,
    /// Entity unlocked.
    Unlocked,
    /// Template resolved into a schedule.
    TemplateApplied,
}

impl AuditAction {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::StatusChanged => "status_changed",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::TemplateApplied => "template_applied",
        }
    }
}

/// Request metadata attached to an entry when available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMetadata {
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub user_agent: Option<String>,
    /// Correlation ID.
    pub request_id: Option<String>,
}

/// Who performed an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Acting user.
    pub user_id: Uuid,
    /// Request context, if the call came through a transport layer.
    pub request: Option<RequestMetadata>,
}

impl Actor {
    /// Actor without request metadata.
    #[must_use]
    pub const fn user(user_id: Uuid) -> Self {
        Self {
            user_id,
            request: None,
        }
    }

    /// Attaches request metadata.
    #[must_use]
    pub fn with_request(mut self, request: RequestMetadata) -> Self {
        self.request = Some(request);
        self
    }
}

/// Append-only audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Kind of entity.
    pub entity_type: AuditEntityType,
    /// Entity ID.
    pub entity_id: Uuid,
    /// Owning agency.
    pub agency_id: Uuid,
    /// What happened.
    pub action: AuditAction,
    /// Snapshot before the change.
    pub old_values: Option<serde_json::Value>,
    /// Snapshot after the change.
    pub new_values: Option<serde_json::Value>,
    /// Acting user.
    pub performed_by: Uuid,
    /// Request context.
    pub request: Option<RequestMetadata>,
    /// When the change was made.
    pub occurred_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Starts an entry for `actor` acting on an entity.
    #[must_use]
    pub fn new(
        entity_type: AuditEntityType,
        entity_id: Uuid,
        agency_id: Uuid,
        action: AuditAction,
        actor: &Actor,
    ) -> Self {
        Self {
            entity_type,
            entity_id,
            agency_id,
            action,
            old_values: None,
            new_values: None,
            performed_by: actor.user_id,
            request: actor.request.clone(),
            occurred_at: Utc::now(),
        }
    }

    /// Records the before-snapshot. Unserializable values are dropped.
    #[must_use]
    pub fn with_old_values(mut self, values: &impl Serialize) -> Self {
        self.old_values = serde_json::to_value(values).ok();
        self
    }

    /// Records the after-snapshot. Unserializable values are dropped.
    #[must_use]
    pub fn with_new_values(mut self, values: &impl Serialize) -> Self {
        self.new_values = serde_json::to_value(values).ok();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_captures_actor_and_snapshots() {
        let actor = Actor::user(Uuid::new_v4()).with_request(RequestMetadata {
            request_id: Some("req-1".into()),
            ..RequestMetadata::default()
        });
        let entry = AuditEntry::new(
            AuditEntityType::Template,
            Uuid::new_v4(),
            Uuid::new_v4(),
            AuditAction::Updated,
            &actor,
        )
        .with_old_values(&json!({ "version": 1 }))
        .with_new_values(&json!({ "version": 2, "item_count": 3 }));

        assert_eq!(entry.performed_by, actor.user_id);
        assert_eq!(entry.old_values.unwrap()["version"], 1);
        assert_eq!(entry.new_values.unwrap()["item_count"], 3);
        assert_eq!(entry.request.unwrap().request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_action_strings_match_serde() {
        for action in [
            AuditAction::Created,
            AuditAction::StatusChanged,
            AuditAction::TemplateApplied,
        ] {
            assert_eq!(
                serde_json::to_value(action).unwrap(),
                json!(action.as_str())
            );
        }
    }
}
