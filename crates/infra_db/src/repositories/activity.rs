//! Activity feed repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for room activity entries
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Creates a new ActivityRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends an entry
    pub async fn insert(&self, activity: &ActivityRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO activities (
                activity_id, room_id, actor_id, actor_name, description, category, occurred_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(activity.activity_id)
        .bind(activity.room_id)
        .bind(activity.actor_id)
        .bind(&activity.actor_name)
        .bind(&activity.description)
        .bind(&activity.category)
        .bind(activity.occurred_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Database row for an activity entry
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityRow {
    pub activity_id: Uuid,
    pub room_id: Uuid,
    pub actor_id: Uuid,
    pub actor_name: String,
    pub description: String,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
}
