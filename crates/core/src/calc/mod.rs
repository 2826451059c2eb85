//! Integer-cent arithmetic and relative date resolution.
//!
//! These are the leaf utilities every schedule computation goes through:
//! - `money` - percentage-of-total rounding and rounding reconciliation
//! - `dates` - relative offsets to absolute due dates

pub mod dates;
pub mod money;

#[cfg(test)]
mod props;

pub use dates::{OffsetDirection, days_between, resolve_relative_date};
pub use money::{
    SequencedAmount, percentage_of_cents, reconcile_rounding_error, saturate_cents, sum_cents,
};
