//! Expense DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use core_kernel::{Currency, ExpenseId, MemberId, Money, SettlementId};
use domain_ledger::{ClearedLedger, Expense, Settlement, SplitSummary};

use super::display_amount;

/// Request to record an expense
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    #[validate(length(min = 1, max = 200, message = "Please provide a description"))]
    pub description: String,
    /// Bounded by `core_kernel::MAX_AMOUNT`
    #[validate(range(
        min = 0.0,
        max = 1_000_000_000_000.0,
        message = "Amount must be between 0 and 1,000,000,000,000"
    ))]
    pub amount: f64,
}

/// Expense as shown to room members
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: ExpenseId,
    pub description: String,
    pub amount: f64,
    pub currency: Currency,
    pub paid_by: MemberId,
    pub created_at: DateTime<Utc>,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            description: expense.description,
            amount: display_amount(expense.amount),
            currency: expense.amount.currency(),
            paid_by: expense.paid_by,
            created_at: expense.created_at,
        }
    }
}

/// One member's entry in the split
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberOwes {
    /// Positive when the member owes, negative when they are owed
    pub owes: f64,
    pub user_id: MemberId,
}

/// Totals and balances keyed by display name
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitResponse {
    pub total: f64,
    pub per_head: f64,
    pub balances: BTreeMap<String, MemberOwes>,
}

impl From<SplitSummary> for SplitResponse {
    fn from(split: SplitSummary) -> Self {
        // Same-named members collapse; the later one in member order wins.
        let balances = split
            .balances
            .into_iter()
            .map(|b| {
                (
                    b.name,
                    MemberOwes {
                        owes: display_amount(b.owes),
                        user_id: b.member_id,
                    },
                )
            })
            .collect();

        Self {
            total: display_amount(split.total),
            per_head: display_amount(split.per_head),
            balances,
        }
    }
}

/// Contributions by display name
pub fn chart_response(data: BTreeMap<String, Money>) -> BTreeMap<String, f64> {
    data.into_iter()
        .map(|(name, amount)| (name, display_amount(amount)))
        .collect()
}

/// A recorded settlement
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResponse {
    pub id: SettlementId,
    pub amount: f64,
    pub currency: Currency,
    pub paid_by: MemberId,
    pub created_at: DateTime<Utc>,
}

impl From<Settlement> for SettlementResponse {
    fn from(settlement: Settlement) -> Self {
        Self {
            id: settlement.id,
            amount: display_amount(settlement.amount),
            currency: settlement.amount.currency(),
            paid_by: settlement.paid_by,
            created_at: settlement.created_at,
        }
    }
}

/// Result of a settle-up
#[derive(Debug, Serialize)]
pub struct SettleResponse {
    pub message: String,
    pub settlement: SettlementResponse,
}

impl From<Settlement> for SettleResponse {
    fn from(settlement: Settlement) -> Self {
        Self {
            message: "Balance settled successfully.".to_string(),
            settlement: settlement.into(),
        }
    }
}

/// Result of clearing the room's ledger
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    pub message: String,
    pub expenses_removed: u64,
    pub settlements_removed: u64,
}

impl From<ClearedLedger> for ClearResponse {
    fn from(cleared: ClearedLedger) -> Self {
        Self {
            message: "All expenses and settlements have been cleared.".to_string(),
            expenses_removed: cleared.expenses,
            settlements_removed: cleared.settlements,
        }
    }
}
