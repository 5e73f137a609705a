use async_trait::async_trait;
use uuid::Uuid;

use super::{expect_affected, PgStore};
use crate::models::RoomMessage;
use crate::repository::{RoomMessageRepository, StoreResult};

#[async_trait]
impl RoomMessageRepository for PgStore {
    async fn create(&self, message: &RoomMessage) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO room_messages (id, room_id, sender_id, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(message.id)
        .bind(message.room_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM room_messages WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        expect_affected(result)
    }

    async fn find_by_room(&self, room_id: Uuid) -> StoreResult<Vec<RoomMessage>> {
        let messages = sqlx::query_as::<_, RoomMessage>(
            "SELECT id, room_id, sender_id, content, created_at, updated_at
             FROM room_messages
             WHERE room_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(room_id)
        .fetch_all(self.pool())
        .await?;
        Ok(messages)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<RoomMessage>> {
        let message = sqlx::query_as::<_, RoomMessage>(
            "SELECT id, room_id, sender_id, content, created_at, updated_at
             FROM room_messages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(message)
    }
}
