//! Audit trail model.
//!
//! Entries are built here and handed to a sink after the business change has
//! committed. Sinks never fail the operation that produced the entry.

pub mod types;

pub use types::{Actor, AuditAction, AuditEntityType, AuditEntry, RequestMetadata};
