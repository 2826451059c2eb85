//! Transaction ledger.
//!
//! Transactions are immutable money movements against one expected payment
//! item. Every write is followed by a full recomputation of the item's
//! cached paid amount and status.

pub mod error;
pub mod sync;
pub mod types;
pub mod validation;

#[cfg(test)]
mod sync_props;

pub use error::LedgerError;
pub use sync::PaymentCacheService;
pub use types::{
    CreateTransactionInput, ItemPaymentState, Movement, PaymentStatus, PaymentTransaction,
    TransactionOutcome, TransactionType,
};
pub use validation::validate_transaction;
