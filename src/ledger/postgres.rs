//! PostgreSQL ledger store
//!
//! The atomic transfer runs in one `sqlx::Transaction`. Both endpoint rows
//! are locked with `SELECT ... FOR UPDATE`, lower id first, so concurrent
//! opposite-direction transfers (A→B and B→A) queue on the same first lock
//! instead of deadlocking. Any early return drops the uncommitted
//! transaction, which rolls it back.
//!
//! Assumed isolation level: READ COMMITTED (PostgreSQL default) or stronger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use super::error::LedgerError;
use super::repository::{LedgerRepository, check_initial_balance, lock_order};
use crate::core_types::{AccountId, UserId};
use crate::models::{Account, NewUser, Role, Transaction, User};
use crate::money::PositiveAmount;

pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: &PgRow) -> Result<Account, LedgerError> {
        Ok(Account {
            id: row.try_get("id")?,
            owner_user_id: row.try_get("user_id")?,
            balance: row.try_get("balance")?,
        })
    }

    fn row_to_transaction(row: &PgRow) -> Result<Transaction, LedgerError> {
        Ok(Transaction {
            id: row.try_get("id")?,
            from_account_id: row.try_get("from_account_id")?,
            to_account_id: row.try_get("to_account_id")?,
            amount: row.try_get("amount")?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }

    fn row_to_user(row: &PgRow) -> Result<User, LedgerError> {
        let role: String = row.try_get("role")?;
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            role: role.parse::<Role>().map_err(LedgerError::Storage)?,
        })
    }
}

/// Lock one account row for the rest of the enclosing transaction
async fn lock_account(conn: &mut PgConnection, id: AccountId) -> Result<Account, LedgerError> {
    let row = sqlx::query("SELECT id, user_id, balance FROM accounts WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => PgLedgerRepository::row_to_account(&row),
        None => Err(LedgerError::AccountNotFound(id)),
    }
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        let row = sqlx::query("SELECT id, user_id, balance FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Self::row_to_account(&row),
            None => Err(LedgerError::AccountNotFound(id)),
        }
    }

    async fn list_accounts(&self, owner_user_id: UserId) -> Result<Vec<Account>, LedgerError> {
        let rows =
            sqlx::query("SELECT id, user_id, balance FROM accounts WHERE user_id = $1 ORDER BY id")
                .bind(owner_user_id)
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(Self::row_to_account).collect()
    }

    async fn open_account(
        &self,
        owner_user_id: UserId,
        initial_balance: Decimal,
    ) -> Result<Account, LedgerError> {
        check_initial_balance(initial_balance)?;

        let row = sqlx::query(
            "INSERT INTO accounts (user_id, balance) VALUES ($1, $2) RETURNING id, user_id, balance",
        )
        .bind(owner_user_id)
        .bind(initial_balance)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_account(&row)
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

        let mut tx = self.pool.begin().await?;

        // Lock both endpoints, lower id first
        let (first_id, second_id) = lock_order(from_id, to_id);
        let first = lock_account(&mut *tx, first_id).await?;
        let second = lock_account(&mut *tx, second_id).await?;
        let source = if first.id == from_id { &first } else { &second };

        if source.balance < amount {
            return Err(LedgerError::InsufficientFunds);
        }

        // Debit source
        sqlx::query("UPDATE accounts SET balance = balance - $1 WHERE id = $2")
            .bind(amount)
            .bind(from_id)
            .execute(&mut *tx)
            .await?;

        // Credit destination
        sqlx::query("UPDATE accounts SET balance = balance + $1 WHERE id = $2")
            .bind(amount)
            .bind(to_id)
            .execute(&mut *tx)
            .await?;

        // Record ledger entry
        let row = sqlx::query(
            "INSERT INTO transactions (from_account_id, to_account_id, amount, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, from_account_id, to_account_id, amount, created_at",
        )
        .bind(from_id)
        .bind(to_id)
        .bind(amount)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;
        let entry = Self::row_to_transaction(&row)?;

        tx.commit().await?;

        Ok(entry)
    }

    async fn list_transactions(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let rows = sqlx::query(
            "SELECT id, from_account_id, to_account_id, amount, created_at
             FROM transactions
             WHERE from_account_id = $1 OR to_account_id = $1
             ORDER BY id",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn record_user(&self, user: NewUser) -> Result<User, LedgerError> {
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3)
             RETURNING id, username, password_hash, role",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Self::row_to_user(&row),
            Err(e) => match LedgerError::from(e) {
                LedgerError::UsernameTaken(_) => Err(LedgerError::UsernameTaken(user.username)),
                other => Err(other),
            },
        }
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, LedgerError> {
        let row =
            sqlx::query("SELECT id, username, password_hash, role FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}
