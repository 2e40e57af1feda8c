//! Test Data Builders
//!
//! `RoomSnapshotBuilder` assembles engine inputs without touching storage.
//! `TestHousehold` wires a `LedgerService` to the in-memory adapters with a
//! three-member room, for service and HTTP tests.

use std::sync::Arc;

use core_kernel::{Currency, Money, RoomId};
use domain_ledger::{
    Expense, InMemoryLedger, InMemoryRooms, LedgerConfig, LedgerService, Member,
    RecordingActivitySink, Room, RoomSnapshot, Settlement,
};
use rust_decimal::Decimal;

use crate::fixtures::{MemberFixtures, TemporalFixtures};

/// Builder for reconciliation inputs
///
/// Members are referred to by their position in insertion order.
pub struct RoomSnapshotBuilder {
    room_id: RoomId,
    currency: Currency,
    members: Vec<Member>,
    expenses: Vec<(usize, Decimal)>,
    settlements: Vec<(usize, Decimal)>,
}

impl Default for RoomSnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomSnapshotBuilder {
    /// Creates an empty INR room
    pub fn new() -> Self {
        Self {
            room_id: RoomId::new(),
            currency: Currency::INR,
            members: Vec::new(),
            expenses: Vec::new(),
            settlements: Vec::new(),
        }
    }

    /// Sets the room currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Adds a member with a fresh id
    pub fn with_member(mut self, name: &str) -> Self {
        self.members.push(Member::new(core_kernel::MemberId::new(), name));
        self
    }

    /// Adds several members at once
    pub fn with_members(self, names: &[&str]) -> Self {
        names.iter().fold(self, |builder, name| builder.with_member(name))
    }

    /// Records an expense paid by the member at `payer`
    pub fn with_expense(mut self, payer: usize, amount: Decimal) -> Self {
        self.expenses.push((payer, amount));
        self
    }

    /// Records a settlement paid by the member at `payer`
    pub fn with_settlement(mut self, payer: usize, amount: Decimal) -> Self {
        self.settlements.push((payer, amount));
        self
    }

    /// Members in insertion order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Builds the snapshot
    ///
    /// # Panics
    ///
    /// Panics on an out-of-range member index or an amount the ledger rejects
    pub fn build(self) -> RoomSnapshot {
        let mut snapshot = RoomSnapshot::empty(self.room_id, self.currency);

        for (minute, (payer, amount)) in self.expenses.into_iter().enumerate() {
            let expense = Expense::new(
                self.room_id,
                self.members[payer].id,
                "Shared",
                Money::new(amount, self.currency),
            )
            .expect("test expense should be valid")
            .with_created_at(TemporalFixtures::minutes_in(minute as i64));
            snapshot.expenses.push(expense);
        }

        for (minute, (payer, amount)) in self.settlements.into_iter().enumerate() {
            let settlement = Settlement::new(
                self.room_id,
                self.members[payer].id,
                Money::new(amount, self.currency),
            )
            .expect("test settlement should be valid")
            .with_created_at(TemporalFixtures::minutes_in(minute as i64));
            snapshot.settlements.push(settlement);
        }

        snapshot.members = self.members;
        snapshot
    }
}

/// A `LedgerService` over in-memory adapters with one room
///
/// Asha owns the room; Ravi and Meera are members. `stranger` belongs to no
/// room.
pub struct TestHousehold {
    pub service: Arc<LedgerService>,
    pub rooms: Arc<InMemoryRooms>,
    pub ledger: Arc<InMemoryLedger>,
    pub activity: Arc<RecordingActivitySink>,
    pub room: Room,
    pub owner: Member,
    pub ravi: Member,
    pub meera: Member,
    pub stranger: Member,
}

impl TestHousehold {
    /// Household with the default ledger configuration
    pub async fn new() -> Self {
        Self::with_config(LedgerConfig::default()).await
    }

    /// Household with a custom ledger configuration
    pub async fn with_config(config: LedgerConfig) -> Self {
        let owner = MemberFixtures::asha();
        let ravi = MemberFixtures::ravi();
        let meera = MemberFixtures::meera();
        let room = Room::new("Flat 4B", owner.clone(), Currency::INR)
            .with_member(ravi.clone())
            .with_member(meera.clone());

        let rooms = Arc::new(InMemoryRooms::with_rooms(vec![room.clone()]).await);
        let ledger = Arc::new(InMemoryLedger::new());
        let activity = Arc::new(RecordingActivitySink::new());
        let service = Arc::new(LedgerService::new(
            rooms.clone(),
            ledger.clone(),
            activity.clone(),
            config,
        ));

        Self {
            service,
            rooms,
            ledger,
            activity,
            room,
            owner,
            ravi,
            meera,
            stranger: MemberFixtures::stranger(),
        }
    }

    /// Everyone in the room, owner first
    pub fn members(&self) -> [&Member; 3] {
        [&self.owner, &self.ravi, &self.meera]
    }
}
