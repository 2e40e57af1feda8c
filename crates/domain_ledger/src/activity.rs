//! Activity feed events
//!
//! Every ledger mutation that other room members should hear about produces
//! one `ActivityEvent`, which the `ActivitySink` records and broadcasts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{ActivityId, MemberId, Money, RoomId};

use crate::room::Member;

/// Feed category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Join,
    Leave,
    Expense,
    Purchase,
    Lock,
    Calendar,
    Chat,
}

impl ActivityCategory {
    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Join => "join",
            ActivityCategory::Leave => "leave",
            ActivityCategory::Expense => "expense",
            ActivityCategory::Purchase => "purchase",
            ActivityCategory::Lock => "lock",
            ActivityCategory::Calendar => "calendar",
            ActivityCategory::Chat => "chat",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A human-readable entry in a room's activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: ActivityId,
    pub room_id: RoomId,
    pub actor: MemberId,
    pub actor_name: String,
    pub description: String,
    pub category: ActivityCategory,
    pub occurred_at: DateTime<Utc>,
}

impl ActivityEvent {
    /// Creates an event attributed to `actor`
    pub fn new(
        room_id: RoomId,
        actor: &Member,
        description: impl Into<String>,
        category: ActivityCategory,
    ) -> Self {
        Self {
            id: ActivityId::new_v7(),
            room_id,
            actor: actor.id,
            actor_name: actor.name.clone(),
            description: description.into(),
            category,
            occurred_at: Utc::now(),
        }
    }

    /// Event for a newly recorded expense
    pub fn expense_added(room_id: RoomId, actor: &Member, description: &str, amount: Money) -> Self {
        Self::new(
            room_id,
            actor,
            format!("{} added an expense: {} for {}", actor.name, description, amount),
            ActivityCategory::Expense,
        )
    }

    /// Event for a settle-up; the amount is shown rounded to the currency's minor unit
    pub fn settled(room_id: RoomId, actor: &Member, amount: Money) -> Self {
        Self::new(
            room_id,
            actor,
            format!("{} settled their expenses for {}", actor.name, amount.round_to_currency()),
            ActivityCategory::Expense,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_settled_description_rounds_amount() {
        let actor = Member::new(MemberId::new(), "Ravi");
        let event = ActivityEvent::settled(
            RoomId::new(),
            &actor,
            Money::new(dec!(33.333333333), Currency::INR),
        );

        assert_eq!(event.description, "Ravi settled their expenses for ₹33.33");
        assert_eq!(event.category, ActivityCategory::Expense);
        assert_eq!(event.actor, actor.id);
    }

    #[test]
    fn test_expense_added_description() {
        let actor = Member::new(MemberId::new(), "Asha");
        let event = ActivityEvent::expense_added(
            RoomId::new(),
            &actor,
            "Milk",
            Money::new(dec!(60), Currency::INR),
        );
        assert_eq!(event.description, "Asha added an expense: Milk for ₹60.00");
    }

    #[test]
    fn test_category_round_trip_names() {
        for category in [
            ActivityCategory::Join,
            ActivityCategory::Leave,
            ActivityCategory::Expense,
            ActivityCategory::Purchase,
            ActivityCategory::Lock,
            ActivityCategory::Calendar,
            ActivityCategory::Chat,
        ] {
            let json = format!("\"{}\"", category.as_str());
            assert_eq!(serde_json::from_str::<ActivityCategory>(&json).unwrap(), category);
        }
        assert!(serde_json::from_str::<ActivityCategory>("\"party\"").is_err());
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&ActivityCategory::Calendar).unwrap();
        assert_eq!(json, "\"calendar\"");
    }
}
