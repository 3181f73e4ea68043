//! Ledger Repository
//!
//! Narrow transactional capability over the data store. Implementations:
//! - [`PgLedgerRepository`](super::postgres::PgLedgerRepository): PostgreSQL
//! - [`InMemoryLedgerRepository`](super::memory::InMemoryLedgerRepository): in-process
//!
//! Implementations trust their caller: ownership and amount validation happen
//! in the [`TransferEngine`](super::engine::TransferEngine).

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::error::LedgerError;
use crate::core_types::{AccountId, UserId};
use crate::models::{Account, NewUser, Transaction, User};
use crate::money::PositiveAmount;

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Get adapter name for logging
    fn name(&self) -> &'static str;

    /// Point read. No lock is taken.
    async fn get_account(&self, id: AccountId) -> Result<Account, LedgerError>;

    /// All accounts of one owner, ordered by account id
    async fn list_accounts(&self, owner_user_id: UserId) -> Result<Vec<Account>, LedgerError>;

    /// Open an account with an initial balance (must be >= 0)
    async fn open_account(
        &self,
        owner_user_id: UserId,
        initial_balance: Decimal,
    ) -> Result<Account, LedgerError>;

    /// Atomic transfer primitive.
    ///
    /// Locks both rows (lower id first), checks the source balance, moves
    /// `amount` and appends exactly one ledger entry in a single unit of
    /// work. On any error nothing is observable.
    async fn transfer(
        &self,
        from_id: AccountId,
        to_id: AccountId,
        amount: PositiveAmount,
    ) -> Result<Transaction, LedgerError>;

    /// Ledger entries where `account_id` is either endpoint, oldest first
    async fn list_transactions(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, LedgerError>;

    /// Insert a user; duplicate usernames fail with `UsernameTaken`
    async fn record_user(&self, user: NewUser) -> Result<User, LedgerError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, LedgerError>;
}

/// Validate an initial balance before opening an account
pub(crate) fn check_initial_balance(initial_balance: Decimal) -> Result<(), LedgerError> {
    if initial_balance < Decimal::ZERO {
        return Err(LedgerError::validation("initial balance cannot be negative"));
    }
    Ok(())
}

/// Lock acquisition order for a transfer: lower id first
pub(crate) fn lock_order(a: AccountId, b: AccountId) -> (AccountId, AccountId) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_order_is_ascending() {
        assert_eq!(lock_order(1, 2), (1, 2));
        assert_eq!(lock_order(9, 3), (3, 9));
    }

    #[test]
    fn test_negative_initial_balance_rejected() {
        assert!(check_initial_balance(Decimal::ZERO).is_ok());
        assert!(check_initial_balance(Decimal::from(-1)).is_err());
    }
}
