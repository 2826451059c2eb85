//! Repositories over the payment schedule tables.
//!
//! Every read and write is scoped to an agency: a row owned by another agency
//! is reported exactly like a missing one.

pub mod activity_pricing;
pub mod booking_status;
mod convert;
pub mod payment_transaction;
pub mod schedule;
pub mod template;

pub use activity_pricing::{ActivityPricingRepository, PricedActivityLookup};
pub use booking_status::{BookingStatusError, BookingStatusRepository};
pub use payment_transaction::{PaymentTransactionError, TransactionRepository};
pub use schedule::{ScheduleRepository, ScheduleStoreError};
pub use template::{TemplateRepository, TemplateStoreError};
