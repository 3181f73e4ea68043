//! In-process ledger store
//!
//! Each account row sits behind its own mutex, so transfers touching
//! disjoint accounts run in parallel. A transfer locks its two rows in
//! ascending id order and appends the ledger entry while both are held.
//! Every check runs before the first mutation, which makes the critical
//! section all-or-nothing. There is no await point inside it.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::repository::{LedgerRepository, check_initial_balance, lock_order};
use crate::core_types::{AccountId, UserId};
use crate::models::{Account, NewUser, Transaction, User};
use crate::money::PositiveAmount;

type AccountRow = Arc<Mutex<Account>>;

#[derive(Default)]
pub struct InMemoryLedgerRepository {
    accounts: DashMap<AccountId, AccountRow>,
    users: DashMap<String, User>,
    transactions: Mutex<Vec<Transaction>>,
    next_account_id: AtomicI64,
    next_user_id: AtomicI64,
    next_transaction_id: AtomicI64,
    /// Fail the next transfer at commit time
    fail_next_commit: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, LedgerError> {
    mutex
        .lock()
        .map_err(|_| LedgerError::Storage("ledger lock poisoned".to_string()))
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next transfer fail with `StorageError` after its checks pass
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Sum of every account balance
    pub fn total_balance(&self) -> Result<Decimal, LedgerError> {
        let mut total = Decimal::ZERO;
        for row in self.rows() {
            total += lock(&row)?.balance;
        }
        Ok(total)
    }

    /// Every ledger entry, oldest first
    pub fn all_transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        Ok(lock(&self.transactions)?.clone())
    }

    fn row(&self, id: AccountId) -> Result<AccountRow, LedgerError> {
        self.accounts
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Snapshot of row handles; no row lock is held while the map is read
    fn rows(&self) -> Vec<AccountRow> {
        self.accounts.iter().map(|r| r.value().clone()).collect()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        let row = self.row(id)?;
        let account = lock(&row)?.clone();
        Ok(account)
    }

    async fn list_accounts(&self, owner_user_id: UserId) -> Result<Vec<Account>, LedgerError> {
        let mut accounts = Vec::new();
        for row in self.rows() {
            let account = lock(&row)?;
            if account.owner_user_id == owner_user_id {
                accounts.push(account.clone());
            }
        }
        accounts.sort_by_key(|a| a.id);
        Ok(accounts)
    }

    async fn open_account(
        &self,
        owner_user_id: UserId,
        initial_balance: Decimal,
    ) -> Result<Account, LedgerError> {
        check_initial_balance(initial_balance)?;

        let account = Account {
            id: self.next_account_id.fetch_add(1, Ordering::SeqCst) + 1,
            owner_user_id,
            balance: initial_balance,
        };
        self.accounts
            .insert(account.id, Arc::new(Mutex::new(account.clone())));
        Ok(account)
    }

    async fn transfer(
        &self,
        from_id: AccountId,
        to_id: AccountId,
        amount: PositiveAmount,
    ) -> Result<Transaction, LedgerError> {
        if from_id == to_id {
            return Err(LedgerError::validation(
                "source and destination accounts must differ",
            ));
        }
        let amount = amount.get();

        // Lock both endpoints, lower id first
        let (first_id, second_id) = lock_order(from_id, to_id);
        let first_row = self.row(first_id)?;
        let second_row = self.row(second_id)?;
        let mut first = lock(&first_row)?;
        let mut second = lock(&second_row)?;
        let (source, destination) = if first.id == from_id {
            (&mut *first, &mut *second)
        } else {
            (&mut *second, &mut *first)
        };

        if source.balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }
        let debited = source.balance - amount;
        let credited = destination
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Storage("balance overflow".to_string()))?;

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::Storage("commit failed".to_string()));
        }

        let mut log = lock(&self.transactions)?;
        let entry = Transaction {
            id: self.next_transaction_id.fetch_add(1, Ordering::SeqCst) + 1,
            from_account_id: from_id,
            to_account_id: to_id,
            amount,
            created_at: Utc::now(),
        };

        source.balance = debited;
        destination.balance = credited;
        log.push(entry.clone());

        Ok(entry)
    }

    async fn list_transactions(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        Ok(lock(&self.transactions)?
            .iter()
            .filter(|t| t.touches(account_id))
            .cloned()
            .collect())
    }

    async fn record_user(&self, user: NewUser) -> Result<User, LedgerError> {
        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(LedgerError::UsernameTaken(user.username)),
            Entry::Vacant(slot) => {
                let record = User {
                    id: self.next_user_id.fetch_add(1, Ordering::SeqCst) + 1,
                    username: user.username,
                    password_hash: user.password_hash,
                    role: user.role,
                };
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, LedgerError> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }
}
