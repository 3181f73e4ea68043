//! Transfer handler

use std::sync::Arc;

use axum::{Extension, extract::State};

use super::super::state::AppState;
use super::super::types::{ApiJson, ApiResponse, ApiResult, TransactionData, TransferRequest, ok};
use crate::ledger::{LedgerError, TransferCommand};
use crate::models::AuthenticatedUser;
use crate::money;

/// Move funds between two accounts
///
/// POST /transfer
///
/// The caller must own the source account.
#[utoipa::path(
    post,
    path = "/transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer committed", body = ApiResponse<TransactionData>),
        (status = 400, description = "Validation, permission, missing account or insufficient funds"),
        (status = 401, description = "Authentication failed"),
        (status = 500, description = "Storage error, safe to retry")
    ),
    security(("bearer_auth" = [])),
    tag = "Transfer"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(req): ApiJson<TransferRequest>,
) -> ApiResult<TransactionData> {
    let amount = money::parse_decimal(&req.amount).map_err(LedgerError::from)?;

    let entry = state
        .engine
        .transfer_funds(
            &user,
            TransferCommand {
                from_account_id: req.from_account_id,
                to_account_id: req.to_account_id,
                amount,
            },
        )
        .await?;

    ok(TransactionData::from(&entry))
}
