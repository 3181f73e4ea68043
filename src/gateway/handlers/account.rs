//! Account handlers

use std::sync::Arc;

use axum::{Extension, extract::State};

use super::super::state::AppState;
use super::super::types::{AccountData, ApiPath, ApiResponse, ApiResult, TransactionData, created, ok};
use crate::core_types::AccountId;
use crate::models::AuthenticatedUser;

/// List the caller's accounts
///
/// GET /accounts
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "Accounts owned by the caller", body = ApiResponse<Vec<AccountData>>),
        (status = 401, description = "Authentication failed"),
        (status = 500, description = "Storage error")
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<AccountData>> {
    let accounts = state.engine.list_accounts(&user).await?;
    ok(accounts.iter().map(AccountData::from).collect())
}

/// Open a zero-balance account for the caller
///
/// POST /accounts
#[utoipa::path(
    post,
    path = "/accounts",
    responses(
        (status = 201, description = "Account opened", body = ApiResponse<AccountData>),
        (status = 401, description = "Authentication failed"),
        (status = 500, description = "Storage error")
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn open_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<AccountData> {
    let account = state.engine.open_account(&user).await?;
    created(AccountData::from(&account))
}

/// Ledger entries touching one of the caller's accounts
///
/// GET /accounts/{id}/transactions
#[utoipa::path(
    get,
    path = "/accounts/{id}/transactions",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Transactions, oldest first", body = ApiResponse<Vec<TransactionData>>),
        (status = 400, description = "Account not found or not owned by caller"),
        (status = 401, description = "Authentication failed"),
        (status = 500, description = "Storage error")
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn account_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(account_id): ApiPath<AccountId>,
) -> ApiResult<Vec<TransactionData>> {
    let entries = state.engine.account_history(&user, account_id).await?;
    ok(entries.iter().map(TransactionData::from).collect())
}
