//! Ledger Error Types
//!
//! One taxonomy for the repository, the transfer engine and the HTTP
//! boundary. Every variant has a stable code, an HTTP status suggestion and
//! a retryability flag.

use thiserror::Error;

use crate::core_types::AccountId;
use crate::db::schema::USERNAME_UNIQUE_CONSTRAINT;
use crate::money::MoneyError;

/// PostgreSQL SQLSTATE for unique_violation
const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // === Caller errors (not retryable) ===
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Permission denied: source account does not belong to user")]
    PermissionDenied,

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    // === Infrastructure (retryable by the caller) ===
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Stable error kind for API responses and logs
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "VALIDATION_ERROR",
            LedgerError::PermissionDenied => "PERMISSION_DENIED",
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            LedgerError::UsernameTaken(_) => "USERNAME_TAKEN",
            LedgerError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::Validation(_)
            | LedgerError::PermissionDenied
            | LedgerError::AccountNotFound(_)
            | LedgerError::InsufficientFunds
            | LedgerError::UsernameTaken(_) => 400,
            LedgerError::Storage(_) => 500,
        }
    }

    /// Only infrastructure failures may succeed when the whole operation is
    /// retried unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Storage(_))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }
}

impl LedgerError {
    /// Classify a database error by SQLSTATE and constraint name
    fn from_database(sqlstate: Option<&str>, constraint: Option<&str>, message: &str) -> Self {
        match (sqlstate, constraint) {
            (Some(PG_UNIQUE_VIOLATION), Some(USERNAME_UNIQUE_CONSTRAINT)) => {
                LedgerError::UsernameTaken(message.to_string())
            }
            _ => LedgerError::Storage(message.to_string()),
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            return LedgerError::from_database(
                db_err.code().as_deref(),
                db_err.constraint(),
                db_err.message(),
            );
        }
        LedgerError::Storage(e.to_string())
    }
}

impl From<MoneyError> for LedgerError {
    fn from(e: MoneyError) -> Self {
        LedgerError::Validation(e.to_string())
    }
}
