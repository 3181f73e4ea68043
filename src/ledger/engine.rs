//! Transfer Engine
//!
//! Business-level orchestration in front of the [`LedgerRepository`]:
//!
//! ```text
//! amount > 0 ──▶ from != to ──▶ load source ──▶ owner check ──▶ load destination ──▶ atomic transfer
//!  (no I/O)       (no I/O)      NotFound        PermissionDenied   NotFound            repository result
//! ```
//!
//! The engine adds its own validation and authorization errors ahead of the
//! repository call and surfaces repository errors unchanged. It never
//! retries: a `StorageError` is returned to the caller, who may retry the
//! whole operation.

use std::sync::Arc;

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::guard;
use super::repository::LedgerRepository;
use crate::core_types::AccountId;
use crate::models::{Account, AuthenticatedUser, Transaction};
use crate::money::PositiveAmount;

/// A transfer as requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferCommand {
    pub from_account_id: AccountId,
    pub to_account_id: AccountId,
    pub amount: Decimal,
}

pub struct TransferEngine {
    repo: Arc<dyn LedgerRepository>,
}

impl TransferEngine {
    pub fn new(repo: Arc<dyn LedgerRepository>) -> Self {
        tracing::info!(store = repo.name(), "Transfer engine initialized");
        Self { repo }
    }

    /// Move `amount` from one account to another on behalf of `actor`.
    ///
    /// On success exactly one ledger entry exists for the transfer and the
    /// two balances changed by `amount` in opposite directions. On failure
    /// nothing changed.
    pub async fn transfer_funds(
        &self,
        actor: &AuthenticatedUser,
        cmd: TransferCommand,
    ) -> Result<Transaction, LedgerError> {
        let result = self.execute_transfer(actor, cmd).await;

        match &result {
            Ok(entry) => tracing::info!(
                user_id = actor.user_id,
                transaction_id = entry.id,
                from = cmd.from_account_id,
                to = cmd.to_account_id,
                amount = %cmd.amount,
                "Transfer committed"
            ),
            Err(e) if e.is_retryable() => tracing::error!(
                user_id = actor.user_id,
                from = cmd.from_account_id,
                to = cmd.to_account_id,
                amount = %cmd.amount,
                error = %e,
                "Transfer failed in storage"
            ),
            Err(e) => tracing::warn!(
                user_id = actor.user_id,
                from = cmd.from_account_id,
                to = cmd.to_account_id,
                amount = %cmd.amount,
                code = e.code(),
                "Transfer rejected"
            ),
        }

        result
    }

    async fn execute_transfer(
        &self,
        actor: &AuthenticatedUser,
        cmd: TransferCommand,
    ) -> Result<Transaction, LedgerError> {
        let amount = PositiveAmount::new(cmd.amount)?;
        if cmd.from_account_id == cmd.to_account_id {
            return Err(LedgerError::validation(
                "source and destination accounts must differ",
            ));
        }

        let source = self.repo.get_account(cmd.from_account_id).await?;
        guard::ensure_owner(actor.user_id, &source)?;

        // Destination existence is checked again under lock by the repository
        self.repo.get_account(cmd.to_account_id).await?;

        self.repo
            .transfer(cmd.from_account_id, cmd.to_account_id, amount)
            .await
    }

    /// Accounts owned by the acting user
    pub async fn list_accounts(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<Account>, LedgerError> {
        self.repo.list_accounts(actor.user_id).await
    }

    /// Open a zero-balance account for the acting user
    pub async fn open_account(&self, actor: &AuthenticatedUser) -> Result<Account, LedgerError> {
        let account = self.repo.open_account(actor.user_id, Decimal::ZERO).await?;
        tracing::info!(
            user_id = actor.user_id,
            account_id = account.id,
            "Account opened"
        );
        Ok(account)
    }

    /// Ledger entries touching an account the acting user owns
    pub async fn account_history(
        &self,
        actor: &AuthenticatedUser,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let account = self.repo.get_account(account_id).await?;
        guard::ensure_owner(actor.user_id, &account)?;
        self.repo.list_transactions(account_id).await
    }
}
