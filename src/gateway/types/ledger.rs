//! Ledger DTOs
//!
//! Amounts cross the API boundary as decimal strings, never JSON numbers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core_types::{AccountId, TransactionId, UserId};
use crate::models::{Account, Transaction};
use crate::money;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct AccountData {
    #[schema(example = 1)]
    pub id: AccountId,
    #[schema(example = 1)]
    pub owner_user_id: UserId,
    #[schema(example = "100.00")]
    pub balance: String,
}

impl From<&Account> for AccountData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            owner_user_id: account.owner_user_id,
            balance: money::format_amount(account.balance),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct TransactionData {
    #[schema(example = 1)]
    pub id: TransactionId,
    #[schema(example = 1)]
    pub from_account_id: AccountId,
    #[schema(example = 2)]
    pub to_account_id: AccountId,
    #[schema(example = "40.00")]
    pub amount: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Transaction> for TransactionData {
    fn from(entry: &Transaction) -> Self {
        Self {
            id: entry.id,
            from_account_id: entry.from_account_id,
            to_account_id: entry.to_account_id,
            amount: money::format_amount(entry.amount),
            created_at: entry.created_at,
        }
    }
}

/// POST /transfer body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransferRequest {
    #[schema(example = 1)]
    pub from_account_id: AccountId,
    #[schema(example = 2)]
    pub to_account_id: AccountId,
    /// Plain decimal string: no exponent, no leading `.` or `+`, no trailing `.`
    #[schema(example = "40.00")]
    pub amount: String,
}
