//! PostgreSQL Ledger Adapter
//!
//! Implements the three ledger ports (`RoomDirectory`, `LedgerStore`,
//! `ActivitySink`) on top of the repositories in this crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresLedgerAdapter;
//! use domain_ledger::{LedgerService, LedgerConfig};
//! use std::sync::Arc;
//!
//! let adapter = Arc::new(PostgresLedgerAdapter::new(pool));
//! let service = LedgerService::new(
//!     adapter.clone(),
//!     adapter.clone(),
//!     adapter,
//!     LedgerConfig::default(),
//! );
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, Currency, DomainPort, ExpenseId, HealthCheckResult, HealthCheckable, MemberId,
    Money, PortError, RoomId, SettlementId,
};
use domain_ledger::{
    ActivityEvent, ActivitySink, ClearedLedger, Expense, LedgerStore, Member, Room,
    RoomDirectory, Settlement,
};

use crate::error::DatabaseError;
use crate::repositories::{
    ActivityRepository, ActivityRow, ExpenseRow, LedgerRepository, RoomRepository,
    RoomWithMembers, SettlementRow,
};

const ADAPTER_ID: &str = "postgres-ledger-adapter";

/// PostgreSQL-backed implementation of the ledger ports
///
/// Database errors are translated to `PortError` variants:
/// - `DatabaseError::NotFound` -> `PortError::NotFound`
/// - constraint violations -> `PortError::Conflict`
/// - connection failures -> `PortError::Connection`
/// - everything else -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresLedgerAdapter {
    rooms: RoomRepository,
    ledger: LedgerRepository,
    activity: ActivityRepository,
    pool: PgPool,
}

impl PostgresLedgerAdapter {
    /// Creates a new adapter over the pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            rooms: RoomRepository::new(pool.clone()),
            ledger: LedgerRepository::new(pool.clone()),
            activity: ActivityRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresLedgerAdapter {}

#[async_trait]
impl HealthCheckable for PostgresLedgerAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl RoomDirectory for PostgresLedgerAdapter {
    #[instrument(skip_all, fields(member_id = %member_id))]
    async fn room_for_member(&self, member_id: MemberId) -> Result<Option<Room>, PortError> {
        debug!("Resolving room membership");

        self.rooms
            .find_for_member(*member_id.as_uuid())
            .await
            .map_err(db_to_port_error)?
            .map(row_to_room)
            .transpose()
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerAdapter {
    #[instrument(skip_all, fields(room_id = %room_id))]
    async fn expenses_for_room(&self, room_id: RoomId) -> Result<Vec<Expense>, PortError> {
        self.ledger
            .expenses_for_room(*room_id.as_uuid())
            .await
            .map_err(db_to_port_error)?
            .into_iter()
            .map(row_to_expense)
            .collect()
    }

    #[instrument(skip_all, fields(room_id = %room_id))]
    async fn settlements_for_room(&self, room_id: RoomId) -> Result<Vec<Settlement>, PortError> {
        self.ledger
            .settlements_for_room(*room_id.as_uuid())
            .await
            .map_err(db_to_port_error)?
            .into_iter()
            .map(row_to_settlement)
            .collect()
    }

    #[instrument(skip_all, fields(expense_id = %id))]
    async fn get_expense(&self, id: ExpenseId) -> Result<Option<Expense>, PortError> {
        self.ledger
            .get_expense(*id.as_uuid())
            .await
            .map_err(db_to_port_error)?
            .map(row_to_expense)
            .transpose()
    }

    #[instrument(skip_all, fields(expense_id = %expense.id))]
    async fn append_expense(&self, expense: &Expense) -> Result<(), PortError> {
        self.ledger
            .insert_expense(&ExpenseRow {
                expense_id: *expense.id.as_uuid(),
                room_id: *expense.room_id.as_uuid(),
                description: expense.description.clone(),
                amount: expense.amount.amount(),
                currency: expense.amount.currency().code().to_string(),
                paid_by: *expense.paid_by.as_uuid(),
                created_at: expense.created_at,
            })
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip_all, fields(settlement_id = %settlement.id))]
    async fn append_settlement(&self, settlement: &Settlement) -> Result<(), PortError> {
        self.ledger
            .insert_settlement(&SettlementRow {
                settlement_id: *settlement.id.as_uuid(),
                room_id: *settlement.room_id.as_uuid(),
                amount: settlement.amount.amount(),
                currency: settlement.amount.currency().code().to_string(),
                paid_by: *settlement.paid_by.as_uuid(),
                created_at: settlement.created_at,
            })
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip_all, fields(expense_id = %id))]
    async fn delete_expense(&self, id: ExpenseId) -> Result<(), PortError> {
        self.ledger
            .delete_expense(*id.as_uuid())
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    PortError::not_found("Expense", id)
                } else {
                    db_to_port_error(e)
                }
            })
    }

    #[instrument(skip_all, fields(room_id = %room_id))]
    async fn clear_room(&self, room_id: RoomId) -> Result<ClearedLedger, PortError> {
        let (expenses, settlements) = self
            .ledger
            .clear_room(*room_id.as_uuid())
            .await
            .map_err(db_to_port_error)?;

        Ok(ClearedLedger {
            expenses,
            settlements,
        })
    }
}

#[async_trait]
impl ActivitySink for PostgresLedgerAdapter {
    #[instrument(skip_all, fields(room_id = %event.room_id, category = %event.category))]
    async fn record(&self, event: ActivityEvent) -> Result<(), PortError> {
        self.activity
            .insert(&ActivityRow {
                activity_id: *event.id.as_uuid(),
                room_id: *event.room_id.as_uuid(),
                actor_id: *event.actor.as_uuid(),
                actor_name: event.actor_name,
                description: event.description,
                category: event.category.as_str().to_string(),
                occurred_at: event.occurred_at,
            })
            .await
            .map_err(db_to_port_error)
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

/// Converts a database error to a port error
fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound(msg) => PortError::not_found("Record", msg),
        DatabaseError::DuplicateEntry(msg)
        | DatabaseError::ForeignKeyViolation(msg)
        | DatabaseError::ConstraintViolation(msg) => PortError::conflict(msg),
        DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted => PortError::Connection {
            message: e.to_string(),
            source: Some(Box::new(e)),
        },
        other => PortError::Internal {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

fn parse_currency(code: &str) -> Result<Currency, PortError> {
    code.parse::<Currency>()
        .map_err(|e| PortError::internal(format!("stored currency is invalid: {}", e)))
}

fn row_to_room(data: RoomWithMembers) -> Result<Room, PortError> {
    Ok(Room {
        id: RoomId::from(data.room.room_id),
        name: data.room.name,
        owner: MemberId::from(data.room.owner_id),
        members: data
            .members
            .into_iter()
            .map(|m| Member::new(MemberId::from(m.member_id), m.display_name))
            .collect(),
        currency: parse_currency(&data.room.currency)?,
    })
}

fn row_to_expense(row: ExpenseRow) -> Result<Expense, PortError> {
    Ok(Expense {
        id: ExpenseId::from(row.expense_id),
        room_id: RoomId::from(row.room_id),
        description: row.description,
        amount: Money::new(row.amount, parse_currency(&row.currency)?),
        paid_by: MemberId::from(row.paid_by),
        created_at: row.created_at,
    })
}

fn row_to_settlement(row: SettlementRow) -> Result<Settlement, PortError> {
    Ok(Settlement {
        id: SettlementId::from(row.settlement_id),
        room_id: RoomId::from(row.room_id),
        amount: Money::new(row.amount, parse_currency(&row.currency)?),
        paid_by: MemberId::from(row.paid_by),
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_not_found_maps_to_port_not_found() {
        let err = db_to_port_error(DatabaseError::not_found("Expense", "x"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pool_exhaustion_is_transient() {
        let err = db_to_port_error(DatabaseError::PoolExhausted);
        assert!(err.is_transient());
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err = db_to_port_error(DatabaseError::DuplicateEntry("expense_id".to_string()));
        assert!(matches!(err, PortError::Conflict { .. }));
    }

    #[test]
    fn test_expense_row_round_trip() {
        let row = ExpenseRow {
            expense_id: Uuid::now_v7(),
            room_id: Uuid::new_v4(),
            description: "Milk".to_string(),
            amount: dec!(60.50),
            currency: "INR".to_string(),
            paid_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let expense = row_to_expense(row.clone()).unwrap();
        assert_eq!(*expense.id.as_uuid(), row.expense_id);
        assert_eq!(expense.amount, Money::new(dec!(60.50), Currency::INR));
        assert_eq!(*expense.paid_by.as_uuid(), row.paid_by);
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        let row = SettlementRow {
            settlement_id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            amount: dec!(10),
            currency: "XYZ".to_string(),
            paid_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        assert!(row_to_settlement(row).is_err());
    }
}
