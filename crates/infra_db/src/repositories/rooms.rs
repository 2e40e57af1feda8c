//! Room and membership repository
//!
//! Rooms are created and joined by the surrounding room service; the ledger
//! only reads membership, through `find_for_member`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Repository for rooms and their members
#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    /// Creates a new RoomRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the room a member currently belongs to, with all its members
    ///
    /// Members are returned in join order.
    pub async fn find_for_member(
        &self,
        member_id: Uuid,
    ) -> Result<Option<RoomWithMembers>, DatabaseError> {
        let room = sqlx::query_as::<_, RoomRow>(
            r#"
            SELECT r.room_id, r.name, r.owner_id, r.currency, r.created_at
            FROM rooms r
            JOIN room_members m ON m.room_id = r.room_id
            WHERE m.member_id = $1
            "#,
        )
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(room) = room else {
            return Ok(None);
        };

        let members = self.members(room.room_id).await?;
        Ok(Some(RoomWithMembers { room, members }))
    }

    /// Lists the members of a room in join order
    pub async fn members(&self, room_id: Uuid) -> Result<Vec<RoomMemberRow>, DatabaseError> {
        let members = sqlx::query_as::<_, RoomMemberRow>(
            r#"
            SELECT member_id, room_id, display_name, joined_at
            FROM room_members
            WHERE room_id = $1
            ORDER BY joined_at, member_id
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}

// ============================================================================
// Row types
// ============================================================================

/// Database row for a room
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoomRow {
    pub room_id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Database row for a room member
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoomMemberRow {
    pub member_id: Uuid,
    pub room_id: Uuid,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

/// A room together with its current members
#[derive(Debug, Clone)]
pub struct RoomWithMembers {
    pub room: RoomRow,
    pub members: Vec<RoomMemberRow>,
}
