//! Settlements: debt payments a member makes to catch up to the fair share
//!
//! A settlement is not addressed to a particular creditor. It enters a common
//! pool that the reconciliation engine redistributes across everyone who is
//! owed money, in proportion to how much each is owed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{MemberId, Money, RoomId, SettlementId};

use crate::error::LedgerError;

/// A recorded settlement payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier
    pub id: SettlementId,
    /// Room the payment belongs to
    pub room_id: RoomId,
    /// Amount paid (strictly positive)
    pub amount: Money,
    /// Member who paid
    pub paid_by: MemberId,
    /// When the payment was recorded
    pub created_at: DateTime<Utc>,
}

impl Settlement {
    /// Creates a new settlement
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` unless the amount is positive
    pub fn new(room_id: RoomId, paid_by: MemberId, amount: Money) -> Result<Self, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "settlement amount must be positive: {}",
                amount.amount()
            )));
        }

        Ok(Self {
            id: SettlementId::new_v7(),
            room_id,
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
