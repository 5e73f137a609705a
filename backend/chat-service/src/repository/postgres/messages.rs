use async_trait::async_trait;
use uuid::Uuid;

use super::{expect_affected, PgStore};
use crate::models::Message;
use crate::repository::{MessageRepository, StoreResult};

#[async_trait]
impl MessageRepository for PgStore {
    async fn create(&self, message: &Message) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO messages (id, conversation_id, sender_id, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn update(&self, message: &Message) -> StoreResult<()> {
        let result = sqlx::query("UPDATE messages SET content = $2, updated_at = $3 WHERE id = $1")
            .bind(message.id)
            .bind(&message.content)
            .bind(message.updated_at)
            .execute(self.pool())
            .await?;
        expect_affected(result)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        expect_affected(result)
    }

    async fn find_by_conversation(&self, conversation_id: Uuid) -> StoreResult<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT id, conversation_id, sender_id, content, created_at, updated_at
             FROM messages
             WHERE conversation_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id)
        .fetch_all(self.pool())
        .await?;
        Ok(messages)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            "SELECT id, conversation_id, sender_id, content, created_at, updated_at
             FROM messages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(message)
    }
}
