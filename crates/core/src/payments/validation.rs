//! Transaction validation.

use uuid::Uuid;

use super::error::LedgerError;
use super::types::CreateTransactionInput;
use crate::schedule::PricedActivity;

/// Validates a transaction against the activity its item belongs to.
///
/// `activity` is `None` when the item→config→pricing chain is broken; the
/// write is refused because the owning agency cannot be established.
pub fn validate_transaction(
    input: &CreateTransactionInput,
    item_id: Uuid,
    activity: Option<&PricedActivity>,
) -> Result<(), LedgerError> {
    if input.amount_cents < 0 {
        return Err(LedgerError::NegativeAmount(input.amount_cents));
    }

    let activity = activity.ok_or(LedgerError::AgencyUnknown(item_id))?;
    if input.currency != activity.currency {
        return Err(LedgerError::CurrencyMismatch {
            expected: activity.currency.to_string(),
            got: input.currency.to_string(),
        });
    }
    Ok(())
}
