//! Rooms and their members
//!
//! Room membership is owned by the surrounding room service; the ledger only
//! reads it. A member belongs to at most one room at a time.

use serde::{Deserialize, Serialize};

use core_kernel::{Currency, MemberId, RoomId};

/// A household member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Identity issued by the external identity provider
    pub id: MemberId,
    /// Display name
    pub name: String,
}

impl Member {
    /// Creates a member
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A room (household) as seen by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    /// Member allowed to clear the ledger and delete any expense
    pub owner: MemberId,
    /// Current members, including the owner
    pub members: Vec<Member>,
    /// Currency every expense and settlement in the room uses
    pub currency: Currency,
}

impl Room {
    /// Creates a room whose only member is its owner
    pub fn new(name: impl Into<String>, owner: Member, currency: Currency) -> Self {
        Self {
            id: RoomId::new_v7(),
            name: name.into(),
            owner: owner.id,
            members: vec![owner],
            currency,
        }
    }

    /// Adds a member unless already present
    pub fn with_member(mut self, member: Member) -> Self {
        if !self.is_member(member.id) {
            self.members.push(member);
        }
        self
    }

    /// Removes a member; their past expenses stay in the ledger
    pub fn remove_member(&mut self, member_id: MemberId) {
        self.members.retain(|m| m.id != member_id);
    }

    pub fn is_member(&self, member_id: MemberId) -> bool {
        self.members.iter().any(|m| m.id == member_id)
    }

    pub fn is_owner(&self, member_id: MemberId) -> bool {
        self.owner == member_id
    }

    /// Looks up a current member
    pub fn member(&self, member_id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
