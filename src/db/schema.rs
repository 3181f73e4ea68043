//! Ledger schema
//!
//! Idempotent DDL executed at startup. The CHECK constraints back the
//! non-negative balance and positive amount rules at the storage level.

use anyhow::Context;
use sqlx::PgPool;

/// Unique constraint on `users.username`. Violations of it, and only it,
/// surface as a taken username.
pub const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";

const STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id            BIGSERIAL PRIMARY KEY,
        username      TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role          TEXT NOT NULL DEFAULT 'user',
        CONSTRAINT users_username_key UNIQUE (username)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS accounts (
        id      BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id),
        balance NUMERIC NOT NULL DEFAULT 0 CHECK (balance >= 0)
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_accounts_user_id ON accounts(user_id)",
    r#"CREATE TABLE IF NOT EXISTS transactions (
        id              BIGSERIAL PRIMARY KEY,
        from_account_id BIGINT NOT NULL REFERENCES accounts(id),
        to_account_id   BIGINT NOT NULL REFERENCES accounts(id),
        amount          NUMERIC NOT NULL CHECK (amount > 0),
        created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_transactions_from ON transactions(from_account_id)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_to ON transactions(to_account_id)",
];

/// Create tables and indexes if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> anyhow::Result<()> {
    for (i, statement) in STATEMENTS.iter().enumerate() {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("schema statement #{} failed", i))?;
    }
    tracing::info!(statements = STATEMENTS.len(), "Ledger schema ready");
    Ok(())
}
