//! Expense and settlement repository
//!
//! Both tables are append-only. Rows are removed one expense at a time or
//! for a whole room in a single transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for the room ledger
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    /// Creates a new LedgerRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All expenses of a room, newest first
    pub async fn expenses_for_room(&self, room_id: Uuid) -> Result<Vec<ExpenseRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT expense_id, room_id, description, amount, currency, paid_by, created_at
            FROM expenses
            WHERE room_id = $1
            ORDER BY created_at DESC, expense_id DESC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All settlements of a room in the order they were made
    pub async fn settlements_for_room(
        &self,
        room_id: Uuid,
    ) -> Result<Vec<SettlementRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, SettlementRow>(
            r#"
            SELECT settlement_id, room_id, amount, currency, paid_by, created_at
            FROM settlements
            WHERE room_id = $1
            ORDER BY created_at, settlement_id
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Looks up one expense
    pub async fn get_expense(&self, expense_id: Uuid) -> Result<Option<ExpenseRow>, DatabaseError> {
        let row = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT expense_id, room_id, description, amount, currency, paid_by, created_at
            FROM expenses
            WHERE expense_id = $1
            "#,
        )
        .bind(expense_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts an expense
    pub async fn insert_expense(&self, expense: &ExpenseRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO expenses (
                expense_id, room_id, description, amount, currency, paid_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(expense.expense_id)
        .bind(expense.room_id)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(&expense.currency)
        .bind(expense.paid_by)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a settlement
    pub async fn insert_settlement(&self, settlement: &SettlementRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO settlements (
                settlement_id, room_id, amount, currency, paid_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(settlement.settlement_id)
        .bind(settlement.room_id)
        .bind(settlement.amount)
        .bind(&settlement.currency)
        .bind(settlement.paid_by)
        .bind(settlement.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes one expense
    ///
    /// # Errors
    ///
    /// `DatabaseError::NotFound` if no row was deleted
    pub async fn delete_expense(&self, expense_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM expenses WHERE expense_id = $1")
            .bind(expense_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Expense", expense_id));
        }
        Ok(())
    }

    /// Deletes every expense and settlement of a room in one transaction
    ///
    /// Returns the number of expenses and settlements removed.
    pub async fn clear_room(&self, room_id: Uuid) -> Result<(u64, u64), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let expenses = sqlx::query("DELETE FROM expenses WHERE room_id = $1")
            .bind(room_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let settlements = sqlx::query("DELETE FROM settlements WHERE room_id = $1")
            .bind(room_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok((expenses, settlements))
    }
}

// ============================================================================
// Row types
// ============================================================================

/// Database row for an expense
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExpenseRow {
    pub expense_id: Uuid,
    pub room_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub paid_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Database row for a settlement
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SettlementRow {
    pub settlement_id: Uuid,
    pub room_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub paid_by: Uuid,
    pub created_at: DateTime<Utc>,
}
