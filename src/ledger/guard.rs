//! Authorization guard: ownership checks before any mutation.

use super::error::LedgerError;
use crate::core_types::UserId;
use crate::models::Account;

/// Whether `user_id` owns `account`
pub fn owns(user_id: UserId, account: &Account) -> bool {
    account.owner_user_id == user_id
}

pub fn ensure_owner(user_id: UserId, account: &Account) -> Result<(), LedgerError> {
    if owns(user_id, account) {
        Ok(())
    } else {
        Err(LedgerError::PermissionDenied)
    }
}
