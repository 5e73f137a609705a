use async_trait::async_trait;
use uuid::Uuid;

use super::{expect_affected, PgStore, RoomRow};
use crate::models::Room;
use crate::repository::{RoomRepository, StoreResult};

const ROOM_COLUMNS: &str = "id, name, handle, room_type, owner_id, created_at, updated_at";

#[async_trait]
impl RoomRepository for PgStore {
    async fn create(&self, room: &Room) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO rooms (id, name, handle, room_type, owner_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(&room.handle)
        .bind(room.room_type.to_db())
        .bind(room.owner_id)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn update(&self, room: &Room) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE rooms SET name = $2, handle = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(&room.handle)
        .bind(room.updated_at)
        .execute(self.pool())
        .await?;
        expect_affected(result)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        expect_affected(result)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Room>> {
        let row = sqlx::query_as::<_, RoomRow>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        row.map(Room::try_from).transpose()
    }

    async fn find_by_handle(&self, handle: &str) -> StoreResult<Option<Room>> {
        let row = sqlx::query_as::<_, RoomRow>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE handle = $1"
        ))
        .bind(handle)
        .fetch_optional(self.pool())
        .await?;
        row.map(Room::try_from).transpose()
    }
}
