//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{Currency, MoneyError, PortError};

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Settle-up requested while the member's owed amount is within tolerance
    #[error("No outstanding balance to settle (owed {owed})")]
    NoOutstandingBalance {
        owed: Decimal,
    },

    /// Non-finite, negative, or otherwise unusable amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Expense failed validation
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),

    /// The member does not belong to any room
    #[error("Member is not in a room: {0}")]
    NotInRoom(String),

    /// Expense not found in the member's room
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),

    /// The member lacks permission for the operation
    #[error("Not authorized: {0}")]
    Forbidden(String),

    /// Amount currency differs from the room's currency
    #[error("Currency mismatch: room uses {expected}, got {actual}")]
    CurrencyMismatch {
        expected: Currency,
        actual: Currency,
    },

    /// The room's history sums past what the ledger can represent
    #[error("Amount overflow: room totals exceed the representable range")]
    AmountOverflow,

    /// A collaborator port failed
    #[error("Storage error: {0}")]
    Port(#[from] PortError),
}

impl From<MoneyError> for LedgerError {
    fn from(err: MoneyError) -> Self {
        LedgerError::InvalidAmount(err.to_string())
    }
}
