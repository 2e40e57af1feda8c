//! Expense handlers
//!
//! Every route acts on the caller's room, resolved from the authenticated
//! member id.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::collections::BTreeMap;
use validator::Validate;

use core_kernel::{ExpenseId, MemberId, Money};
use domain_ledger::LedgerError;

use crate::dto::expenses::*;
use crate::dto::MessageResponse;
use crate::{error::ApiError, AppState};

/// Lists the room's expenses, newest first
pub async fn list_expenses(
    State(state): State<AppState>,
    Extension(member_id): Extension<MemberId>,
) -> Result<Json<Vec<ExpenseResponse>>, ApiError> {
    let expenses = state.service.list_expenses(member_id).await?;
    Ok(Json(expenses.into_iter().map(Into::into).collect()))
}

/// Records an expense paid by the caller
pub async fn add_expense(
    State(state): State<AppState>,
    Extension(member_id): Extension<MemberId>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseResponse>), ApiError> {
    request.validate()?;

    let (room, _) = state.service.resolve(member_id).await?;
    let amount = Money::from_f64(request.amount, room.currency).map_err(LedgerError::from)?;

    let expense = state
        .service
        .add_expense(member_id, &request.description, amount)
        .await?;

    Ok((StatusCode::CREATED, Json(expense.into())))
}

/// Contributions by member name, for the room's spending chart
pub async fn chart_data(
    State(state): State<AppState>,
    Extension(member_id): Extension<MemberId>,
) -> Result<Json<BTreeMap<String, f64>>, ApiError> {
    let data = state.service.chart_data(member_id).await?;
    Ok(Json(chart_response(data)))
}

/// Total, fair share and everyone's balance
pub async fn split(
    State(state): State<AppState>,
    Extension(member_id): Extension<MemberId>,
) -> Result<Json<SplitResponse>, ApiError> {
    let split = state.service.split(member_id).await?;
    Ok(Json(split.into()))
}

/// Pays off the caller's outstanding share
pub async fn settle(
    State(state): State<AppState>,
    Extension(member_id): Extension<MemberId>,
) -> Result<Json<SettleResponse>, ApiError> {
    let settlement = state.service.settle_up(member_id).await?;
    Ok(Json(settlement.into()))
}

/// Clears every expense and settlement in the room (owner only)
pub async fn clear_expenses(
    State(state): State<AppState>,
    Extension(member_id): Extension<MemberId>,
) -> Result<Json<ClearResponse>, ApiError> {
    let cleared = state.service.clear_ledger(member_id).await?;
    Ok(Json(cleared.into()))
}

/// Deletes one expense (owner or payer)
pub async fn delete_expense(
    State(state): State<AppState>,
    Extension(member_id): Extension<MemberId>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let expense_id: ExpenseId = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid expense id: {}", id)))?;

    state.service.delete_expense(member_id, expense_id).await?;
    Ok(Json(MessageResponse::new("Expense removed.")))
}
