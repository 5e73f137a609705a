//! PostgreSQL implementations of the store traits (sqlx)

mod conversations;
mod memberships;
mod messages;
mod room_messages;
mod rooms;
mod users;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::models::{Room, RoomMembership, RoomRole, RoomType};

/// One pool shared by every repository implementation
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map "no row touched" on update/delete to `StoreError::NotFound`
fn expect_affected(result: sqlx::postgres::PgQueryResult) -> StoreResult<()> {
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct RoomRow {
    id: Uuid,
    name: String,
    handle: Option<String>,
    room_type: String,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RoomRow> for Room {
    type Error = StoreError;

    fn try_from(row: RoomRow) -> Result<Self, Self::Error> {
        let room_type = RoomType::from_db(&row.room_type)
            .ok_or_else(|| StoreError::Corrupt(format!("invalid room_type '{}'", row.room_type)))?;
        Ok(Room {
            id: row.id,
            name: row.name,
            handle: row.handle,
            room_type,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MembershipRow {
    room_id: Uuid,
    user_id: Uuid,
    role: String,
    created_at: DateTime<Utc>,
}

fn parse_role(role: &str) -> StoreResult<RoomRole> {
    RoomRole::from_db(role).ok_or_else(|| StoreError::Corrupt(format!("invalid role '{}'", role)))
}

impl TryFrom<MembershipRow> for RoomMembership {
    type Error = StoreError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(RoomMembership {
            room_id: row.room_id,
            user_id: row.user_id,
            role: parse_role(&row.role)?,
            created_at: row.created_at,
        })
    }
}
