//! Expenses: money a member put into the shared pool

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ExpenseId, MemberId, Money, RoomId, MAX_AMOUNT};

use crate::error::LedgerError;

/// An expense paid by one member on behalf of the room
///
/// Expenses are immutable once recorded; they can only be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,
    /// Room the expense belongs to
    pub room_id: RoomId,
    /// What the money was spent on
    pub description: String,
    /// Amount paid (never negative)
    pub amount: Money,
    /// Member who paid
    pub paid_by: MemberId,
    /// When the expense was recorded
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Creates a new expense
    ///
    /// # Arguments
    ///
    /// * `room_id` - Room the expense is charged to
    /// * `paid_by` - Member who paid
    /// * `description` - Free text, trimmed; must not be blank
    /// * `amount` - Amount paid
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidExpense` if the description is blank
    /// - `LedgerError::InvalidAmount` if the amount is negative or above
    ///   [`MAX_AMOUNT`]
    pub fn new(
        room_id: RoomId,
        paid_by: MemberId,
        description: impl Into<String>,
        amount: Money,
    ) -> Result<Self, LedgerError> {
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(LedgerError::InvalidExpense(
                "Please provide a description".to_string(),
            ));
        }

        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount(format!(
                "expense amount cannot be negative: {}",
                amount.amount()
            )));
        }

        if amount.amount() > MAX_AMOUNT {
            return Err(LedgerError::InvalidAmount(format!(
                "expense amount exceeds the maximum of {}",
                MAX_AMOUNT
            )));
        }

        Ok(Self {
            id: ExpenseId::new_v7(),
            room_id,
            description,
            amount,
            paid_by,
            created_at: Utc::now(),
        })
    }

    /// Overrides the recorded time
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
