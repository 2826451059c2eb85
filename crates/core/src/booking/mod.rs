//! Trip booking status.
//!
//! Rolls every activity's schedule up into per-activity rows and a trip
//! summary. Storage loads the activities; this module only aggregates.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::BookingStatusService;
pub use types::{
    ActivityPaymentStatus, ActivityRecord, ActivityType, BookingStatus, BookingSummary,
    ItemSnapshot, TripInfo,
};
