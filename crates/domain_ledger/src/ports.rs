//! Ledger Domain Ports
//!
//! The ledger depends on three collaborators owned by the surrounding
//! service layer:
//!
//! - [`RoomDirectory`]: which room a member currently belongs to
//! - [`LedgerStore`]: append-only expense and settlement history
//! - [`ActivitySink`]: records and broadcasts activity feed entries
//!
//! The PostgreSQL adapter lives in `infra_db`; [`memory`] provides in-process
//! implementations for tests and local development.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_ledger::{LedgerService, LedgerConfig};
//! use std::sync::Arc;
//!
//! let service = LedgerService::new(rooms, store, activity, LedgerConfig::default());
//! let sheet = service.balances(member_id).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{DomainPort, ExpenseId, HealthCheckable, MemberId, PortError, RoomId};

use crate::activity::ActivityEvent;
use crate::expense::Expense;
use crate::room::Room;
use crate::settlement::Settlement;

/// Room membership lookup
#[async_trait]
pub trait RoomDirectory: DomainPort {
    /// Returns the member's current room, or `None` if they are not in one
    async fn room_for_member(&self, member_id: MemberId) -> Result<Option<Room>, PortError>;
}

/// Counts of records removed by [`LedgerStore::clear_room`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearedLedger {
    pub expenses: u64,
    pub settlements: u64,
}

/// Expense and settlement persistence
///
/// Records are append-only. The only deletions are a single expense and the
/// bulk clear of a room, which must remove expenses and settlements together.
#[async_trait]
pub trait LedgerStore: DomainPort + HealthCheckable {
    /// All expenses recorded for the room
    async fn expenses_for_room(&self, room_id: RoomId) -> Result<Vec<Expense>, PortError>;

    /// All settlements recorded for the room
    async fn settlements_for_room(&self, room_id: RoomId) -> Result<Vec<Settlement>, PortError>;

    /// Looks up one expense
    async fn get_expense(&self, id: ExpenseId) -> Result<Option<Expense>, PortError>;

    /// Appends an expense
    async fn append_expense(&self, expense: &Expense) -> Result<(), PortError>;

    /// Appends a settlement
    async fn append_settlement(&self, settlement: &Settlement) -> Result<(), PortError>;

    /// Deletes one expense; `PortError::NotFound` if it does not exist
    async fn delete_expense(&self, id: ExpenseId) -> Result<(), PortError>;

    /// Atomically deletes every expense and settlement of the room
    async fn clear_room(&self, room_id: RoomId) -> Result<ClearedLedger, PortError>;
}

/// Activity log and notification fan-out
#[async_trait]
pub trait ActivitySink: DomainPort {
    /// Durably records the event and broadcasts it to the room
    async fn record(&self, event: ActivityEvent) -> Result<(), PortError>;
}

/// In-memory adapters
///
/// Everything lives behind `tokio::sync::RwLock`s; state is lost when the
/// adapter is dropped.
pub mod memory {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// In-memory room directory
    #[derive(Debug, Default)]
    pub struct InMemoryRooms {
        rooms: RwLock<HashMap<RoomId, Room>>,
    }

    impl InMemoryRooms {
        /// Creates an empty directory
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with rooms
        pub async fn with_rooms(rooms: Vec<Room>) -> Self {
            let directory = Self::new();
            for room in rooms {
                directory.upsert(room).await;
            }
            directory
        }

        /// Inserts or replaces a room
        pub async fn upsert(&self, room: Room) {
            self.rooms.write().await.insert(room.id, room);
        }

        /// Removes a member from a room, keeping their ledger history
        pub async fn remove_member(&self, room_id: RoomId, member_id: MemberId) {
            if let Some(room) = self.rooms.write().await.get_mut(&room_id) {
                room.remove_member(member_id);
            }
        }

        /// Deletes a room
        pub async fn remove(&self, room_id: RoomId) -> Option<Room> {
            self.rooms.write().await.remove(&room_id)
        }
    }

    impl DomainPort for InMemoryRooms {}

    #[async_trait]
    impl RoomDirectory for InMemoryRooms {
        async fn room_for_member(&self, member_id: MemberId) -> Result<Option<Room>, PortError> {
            Ok(self
                .rooms
                .read()
                .await
                .values()
                .find(|room| room.is_member(member_id))
                .cloned())
        }
    }

    #[derive(Debug, Default)]
    struct LedgerTables {
        expenses: Vec<Expense>,
        settlements: Vec<Settlement>,
    }

    /// In-memory ledger store
    ///
    /// Expenses and settlements share one lock so that `clear_room` is atomic.
    #[derive(Debug, Default)]
    pub struct InMemoryLedger {
        tables: RwLock<LedgerTables>,
    }

    impl InMemoryLedger {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of stored settlements across all rooms
        pub async fn settlement_count(&self) -> usize {
            self.tables.read().await.settlements.len()
        }
    }

    impl DomainPort for InMemoryLedger {}

    #[async_trait]
    impl HealthCheckable for InMemoryLedger {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "in-memory-ledger".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("In-memory store always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl LedgerStore for InMemoryLedger {
        async fn expenses_for_room(&self, room_id: RoomId) -> Result<Vec<Expense>, PortError> {
            Ok(self
                .tables
                .read()
                .await
                .expenses
                .iter()
                .filter(|e| e.room_id == room_id)
                .cloned()
                .collect())
        }

        async fn settlements_for_room(&self, room_id: RoomId) -> Result<Vec<Settlement>, PortError> {
            Ok(self
                .tables
                .read()
                .await
                .settlements
                .iter()
                .filter(|s| s.room_id == room_id)
                .cloned()
                .collect())
        }

        async fn get_expense(&self, id: ExpenseId) -> Result<Option<Expense>, PortError> {
            Ok(self
                .tables
                .read()
                .await
                .expenses
                .iter()
                .find(|e| e.id == id)
                .cloned())
        }

        async fn append_expense(&self, expense: &Expense) -> Result<(), PortError> {
            let mut tables = self.tables.write().await;
            if tables.expenses.iter().any(|e| e.id == expense.id) {
                return Err(PortError::conflict(format!("expense {} already exists", expense.id)));
            }
            tables.expenses.push(expense.clone());
            Ok(())
        }

        async fn append_settlement(&self, settlement: &Settlement) -> Result<(), PortError> {
            let mut tables = self.tables.write().await;
            if tables.settlements.iter().any(|s| s.id == settlement.id) {
                return Err(PortError::conflict(format!(
                    "settlement {} already exists",
                    settlement.id
                )));
            }
            tables.settlements.push(settlement.clone());
            Ok(())
        }

        async fn delete_expense(&self, id: ExpenseId) -> Result<(), PortError> {
            let mut tables = self.tables.write().await;
            let before = tables.expenses.len();
            tables.expenses.retain(|e| e.id != id);
            if tables.expenses.len() == before {
                return Err(PortError::not_found("Expense", id));
            }
            Ok(())
        }

        async fn clear_room(&self, room_id: RoomId) -> Result<ClearedLedger, PortError> {
            let mut tables = self.tables.write().await;

            let expenses_before = tables.expenses.len();
            tables.expenses.retain(|e| e.room_id != room_id);
            let settlements_before = tables.settlements.len();
            tables.settlements.retain(|s| s.room_id != room_id);

            Ok(ClearedLedger {
                expenses: (expenses_before - tables.expenses.len()) as u64,
                settlements: (settlements_before - tables.settlements.len()) as u64,
            })
        }
    }

    /// Activity sink that keeps every event in memory
    #[derive(Debug, Default)]
    pub struct RecordingActivitySink {
        events: RwLock<Vec<ActivityEvent>>,
    }

    impl RecordingActivitySink {
        /// Creates an empty sink
        pub fn new() -> Self {
            Self::default()
        }

        /// Returns every recorded event in order
        pub async fn events(&self) -> Vec<ActivityEvent> {
            self.events.read().await.clone()
        }

        /// Returns the events recorded for one room
        pub async fn events_for_room(&self, room_id: RoomId) -> Vec<ActivityEvent> {
            self.events
                .read()
                .await
                .iter()
                .filter(|e| e.room_id == room_id)
                .cloned()
                .collect()
        }
    }

    impl DomainPort for RecordingActivitySink {}

    #[async_trait]
    impl ActivitySink for RecordingActivitySink {
        async fn record(&self, event: ActivityEvent) -> Result<(), PortError> {
            self.events.write().await.push(event);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::*;
    use super::*;
    use crate::room::Member;
    use core_kernel::{Currency, Money};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_room_lookup_by_member() {
        let owner = Member::new(MemberId::new(), "Asha");
        let room = Room::new("Flat", owner.clone(), Currency::INR);
        let rooms = InMemoryRooms::with_rooms(vec![room.clone()]).await;

        assert_eq!(rooms.room_for_member(owner.id).await.unwrap(), Some(room));
        assert_eq!(rooms.room_for_member(MemberId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_room_only_touches_that_room() {
        let store = InMemoryLedger::new();
        let kept_room = RoomId::new();
        let cleared_room = RoomId::new();
        let payer = MemberId::new();
        let amount = Money::new(dec!(10), Currency::INR);

        for room_id in [kept_room, cleared_room] {
            store
                .append_expense(&Expense::new(room_id, payer, "Soap", amount).unwrap())
                .await
                .unwrap();
            store
                .append_settlement(&Settlement::new(room_id, payer, amount).unwrap())
                .await
                .unwrap();
        }

        let cleared = store.clear_room(cleared_room).await.unwrap();
        assert_eq!(cleared, ClearedLedger { expenses: 1, settlements: 1 });
        assert_eq!(store.expenses_for_room(kept_room).await.unwrap().len(), 1);
        assert!(store.expenses_for_room(cleared_room).await.unwrap().is_empty());
        assert!(store.settlements_for_room(cleared_room).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_expense() {
        let store = InMemoryLedger::new();
        let err = store.delete_expense(ExpenseId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
