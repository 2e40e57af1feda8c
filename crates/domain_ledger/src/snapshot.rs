//! Point-in-time view of a room's ledger

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, MemberId, RoomId};

use crate::expense::Expense;
use crate::room::{Member, Room};
use crate::settlement::Settlement;

/// Everything the reconciliation engine needs for one computation
///
/// A snapshot is only valid at the moment it was read. Callers must build a
/// fresh one before every balance computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub currency: Currency,
    /// Current members; order does not affect the math
    pub members: Vec<Member>,
    /// Every expense recorded for the room, including those of departed members
    pub expenses: Vec<Expense>,
    /// Every settlement recorded for the room
    pub settlements: Vec<Settlement>,
}

impl RoomSnapshot {
    /// Builds a snapshot from a room and its full history
    pub fn new(room: &Room, expenses: Vec<Expense>, settlements: Vec<Settlement>) -> Self {
        Self {
            room_id: room.id,
            currency: room.currency,
            members: room.members.clone(),
            expenses,
            settlements,
        }
    }

    /// A snapshot with no members and no history
    pub fn empty(room_id: RoomId, currency: Currency) -> Self {
        Self {
            room_id,
            currency,
            members: Vec::new(),
            expenses: Vec::new(),
            settlements: Vec::new(),
        }
    }

    pub fn has_member(&self, member_id: MemberId) -> bool {
        self.members.iter().any(|m| m.id == member_id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
