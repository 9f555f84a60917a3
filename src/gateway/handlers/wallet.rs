//! Wallet handlers: balance, transfer, history
//!
//! All routes sit behind the JWT middleware and act on the caller's own
//! wallet only.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
};
use validator::Validate;

use super::super::auth::AuthenticatedOwner;
use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResponse, ApiResult, BalanceData, HistoryItem, HistoryParams, TransactionView,
    TransferBody, TransferData, ok,
};
use crate::history::HistoryQuery;
use crate::ledger::TransactionId;
use crate::transfer::{TransferError, TransferRequest};

/// GET /wallet/balance
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedOwner>,
) -> ApiResult<BalanceData> {
    let view = state.engine.get_balance(caller.owner_id).await?;
    ok(BalanceData::from(view))
}

/// POST /wallet/transfer
///
/// Replays of a known `transactionId` answer 200 with
/// "Transfer already processed" and the recorded transaction.
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedOwner>,
    payload: Result<Json<TransferBody>, JsonRejection>,
) -> ApiResult<TransferData> {
    let Json(body) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    body.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let transaction_id = body
        .transaction_id
        .as_deref()
        .map(TransactionId::parse)
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let req = TransferRequest {
        recipient: body.recipient_email,
        amount: body.amount.inner(),
        transaction_id,
        note: body.note,
    };

    let outcome = state.engine.transfer(caller.owner_id, req).await?;
    let msg = if outcome.replayed {
        "Transfer already processed"
    } else {
        "Transfer successful"
    };
    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_msg(
            msg,
            TransferData {
                transaction: TransactionView::from(&outcome.receipt),
            },
        )),
    ))
}

/// GET /wallet/transactions?limit&offset
pub async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<AuthenticatedOwner>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> ApiResult<Vec<HistoryItem>> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let entries = state
        .history
        .list_for_owner(
            caller.owner_id,
            HistoryQuery {
                limit: params.limit,
                offset: params.offset,
            },
        )
        .await
        .map_err(TransferError::from)?;

    ok(entries.into_iter().map(HistoryItem::from).collect())
}
