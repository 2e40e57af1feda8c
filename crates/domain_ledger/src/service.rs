//! Ledger service
//!
//! Brackets the pure reconciliation engine with I/O: resolves the caller's
//! room, loads a fresh snapshot for every read, and persists new records
//! through the collaborator ports.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

use core_kernel::{ExpenseId, MemberId, Money, RoomId};

use crate::activity::ActivityEvent;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::expense::Expense;
use crate::ports::{ActivitySink, ClearedLedger, LedgerStore, RoomDirectory};
use crate::reconciliation::{compute_balances, BalanceSheet, MemberBalance};
use crate::room::{Member, Room};
use crate::settle::{amount_owed, prepare_settlement};
use crate::settlement::Settlement;
use crate::snapshot::RoomSnapshot;

/// The split view of a room: totals plus every member's balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub total: Money,
    pub per_head: Money,
    pub balances: Vec<MemberBalance>,
}

impl From<&BalanceSheet> for SplitSummary {
    fn from(sheet: &BalanceSheet) -> Self {
        Self {
            total: sheet.total,
            per_head: sheet.per_head,
            balances: sheet.balances(),
        }
    }
}

/// Room ledger operations on behalf of an authenticated member
pub struct LedgerService {
    rooms: Arc<dyn RoomDirectory>,
    store: Arc<dyn LedgerStore>,
    activity: Arc<dyn ActivitySink>,
    config: LedgerConfig,
    settle_locks: Mutex<HashMap<RoomId, Arc<tokio::sync::Mutex<()>>>>,
}

impl LedgerService {
    /// Creates a service over the given ports
    pub fn new(
        rooms: Arc<dyn RoomDirectory>,
        store: Arc<dyn LedgerStore>,
        activity: Arc<dyn ActivitySink>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            rooms,
            store,
            activity,
            config,
            settle_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The ledger store, for health checks
    pub fn store(&self) -> Arc<dyn LedgerStore> {
        Arc::clone(&self.store)
    }

    /// Resolves the member's current room and their entry in it
    ///
    /// # Errors
    ///
    /// `LedgerError::NotInRoom` when the member has no room
    pub async fn resolve(&self, member_id: MemberId) -> Result<(Room, Member), LedgerError> {
        let room = self
            .rooms
            .room_for_member(member_id)
            .await?
            .ok_or_else(|| LedgerError::NotInRoom(member_id.to_string()))?;

        let member = room
            .member(member_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotInRoom(member_id.to_string()))?;

        Ok((room, member))
    }

    async fn snapshot(&self, room: &Room) -> Result<RoomSnapshot, LedgerError> {
        let expenses = self.store.expenses_for_room(room.id).await?;
        let settlements = self.store.settlements_for_room(room.id).await?;
        debug!(
            room_id = %room.id,
            expenses = expenses.len(),
            settlements = settlements.len(),
            "Loaded room snapshot"
        );
        Ok(RoomSnapshot::new(room, expenses, settlements))
    }

    /// The room's expenses, newest first
    #[instrument(skip_all, fields(member_id = %member_id))]
    pub async fn list_expenses(&self, member_id: MemberId) -> Result<Vec<Expense>, LedgerError> {
        let (room, _) = self.resolve(member_id).await?;
        let mut expenses = self.store.expenses_for_room(room.id).await?;
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(expenses)
    }

    /// Records an expense paid by the member
    ///
    /// # Errors
    ///
    /// - `LedgerError::InvalidExpense` for a blank description
    /// - `LedgerError::InvalidAmount` for a negative amount
    /// - `LedgerError::CurrencyMismatch` if the amount is not in the room's currency
    #[instrument(skip_all, fields(member_id = %member_id, amount = %amount))]
    pub async fn add_expense(
        &self,
        member_id: MemberId,
        description: &str,
        amount: Money,
    ) -> Result<Expense, LedgerError> {
        let (room, member) = self.resolve(member_id).await?;
        if amount.currency() != room.currency {
            return Err(LedgerError::CurrencyMismatch {
                expected: room.currency,
                actual: amount.currency(),
            });
        }

        let expense = Expense::new(room.id, member.id, description, amount)?;
        self.store.append_expense(&expense).await?;

        info!(
            room_id = %room.id,
            expense_id = %expense.id,
            amount = %expense.amount,
            "Expense recorded"
        );

        self.publish(ActivityEvent::expense_added(
            room.id,
            &member,
            &expense.description,
            expense.amount,
        ))
        .await;

        Ok(expense)
    }

    /// Deletes an expense; allowed for the room owner and the payer
    ///
    /// # Errors
    ///
    /// - `LedgerError::ExpenseNotFound` if the expense is not in the member's room
    /// - `LedgerError::Forbidden` if the member is neither owner nor payer
    #[instrument(skip_all, fields(member_id = %member_id, expense_id = %expense_id))]
    pub async fn delete_expense(
        &self,
        member_id: MemberId,
        expense_id: ExpenseId,
    ) -> Result<(), LedgerError> {
        let (room, _) = self.resolve(member_id).await?;

        let expense = self
            .store
            .get_expense(expense_id)
            .await?
            .filter(|e| e.room_id == room.id)
            .ok_or_else(|| LedgerError::ExpenseNotFound(expense_id.to_string()))?;

        if !room.is_owner(member_id) && expense.paid_by != member_id {
            return Err(LedgerError::Forbidden(
                "only the room owner or the payer can delete an expense".to_string(),
            ));
        }

        self.store.delete_expense(expense_id).await.map_err(|e| {
            if e.is_not_found() {
                LedgerError::ExpenseNotFound(expense_id.to_string())
            } else {
                e.into()
            }
        })?;

        info!(room_id = %room.id, expense_id = %expense_id, "Expense deleted");
        Ok(())
    }

    /// Deletes every expense and settlement in the room; owner only
    #[instrument(skip_all, fields(member_id = %member_id))]
    pub async fn clear_ledger(&self, member_id: MemberId) -> Result<ClearedLedger, LedgerError> {
        let (room, _) = self.resolve(member_id).await?;
        if !room.is_owner(member_id) {
            return Err(LedgerError::Forbidden(
                "only the room owner can clear expenses".to_string(),
            ));
        }

        let cleared = self.store.clear_room(room.id).await?;
        info!(
            room_id = %room.id,
            expenses = cleared.expenses,
            settlements = cleared.settlements,
            "Ledger cleared"
        );
        Ok(cleared)
    }

    /// Reconciles the member's room from a fresh snapshot
    #[instrument(skip_all, fields(member_id = %member_id))]
    pub async fn balances(&self, member_id: MemberId) -> Result<BalanceSheet, LedgerError> {
        let (room, _) = self.resolve(member_id).await?;
        let snapshot = self.snapshot(&room).await?;
        compute_balances(&snapshot)
    }

    /// Totals and per-member balances
    pub async fn split(&self, member_id: MemberId) -> Result<SplitSummary, LedgerError> {
        let sheet = self.balances(member_id).await?;
        Ok(SplitSummary::from(&sheet))
    }

    /// Contributions by display name above the configured chart threshold
    pub async fn chart_data(
        &self,
        member_id: MemberId,
    ) -> Result<BTreeMap<String, Money>, LedgerError> {
        let sheet = self.balances(member_id).await?;
        Ok(sheet.chart_data(self.config.chart_threshold))
    }

    /// What the member would pay if they settled now
    pub async fn outstanding(&self, member_id: MemberId) -> Result<Money, LedgerError> {
        let (room, _) = self.resolve(member_id).await?;
        let snapshot = self.snapshot(&room).await?;
        amount_owed(&snapshot, member_id)
    }

    /// Pays off the member's outstanding share
    ///
    /// Settle-ups in the same room run one at a time, each against a freshly
    /// loaded history, so a second request sees the first one's settlement.
    ///
    /// # Errors
    ///
    /// `LedgerError::NoOutstandingBalance` when the owed amount is within the
    /// configured tolerance. Nothing is written in that case.
    #[instrument(skip_all, fields(member_id = %member_id))]
    pub async fn settle_up(&self, member_id: MemberId) -> Result<Settlement, LedgerError> {
        let (room, member) = self.resolve(member_id).await?;

        let lock = self.settle_lock(room.id);
        let _guard = lock.lock().await;

        let snapshot = self.snapshot(&room).await?;
        let settlement = prepare_settlement(&snapshot, member_id, self.config.settle_tolerance)?;
        self.store.append_settlement(&settlement).await?;

        info!(
            room_id = %room.id,
            settlement_id = %settlement.id,
            amount = %settlement.amount,
            "Member settled up"
        );

        self.publish(ActivityEvent::settled(room.id, &member, settlement.amount))
            .await;

        Ok(settlement)
    }

    /// Removes the ledger of a room that is being deleted
    #[instrument(skip_all, fields(room_id = %room_id))]
    pub async fn teardown_room(&self, room_id: RoomId) -> Result<ClearedLedger, LedgerError> {
        let cleared = self.store.clear_room(room_id).await?;
        self.release_settle_lock(room_id);
        info!(
            expenses = cleared.expenses,
            settlements = cleared.settlements,
            "Room ledger removed"
        );
        Ok(cleared)
    }

    /// Owed amount at or below which settle-up is refused
    pub fn settle_tolerance(&self) -> Decimal {
        self.config.settle_tolerance
    }

    fn settle_lock(&self, room_id: RoomId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .settle_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(locks.entry(room_id).or_default())
    }

    fn release_settle_lock(&self, room_id: RoomId) {
        self.settle_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&room_id);
    }

    // The write already succeeded, so a failing feed must not fail the request.
    async fn publish(&self, event: ActivityEvent) {
        let room_id = event.room_id;
        if let Err(error) = self.activity.record(event).await {
            warn!(room_id = %room_id, error = %error, "Failed to record activity");
        }
    }
}
