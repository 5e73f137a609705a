use async_trait::async_trait;
use uuid::Uuid;

use super::PgStore;
use crate::models::Conversation;
use crate::repository::{ConversationRepository, StoreResult};

#[async_trait]
impl ConversationRepository for PgStore {
    async fn create(&self, conversation: &Conversation) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO conversations (id, participant_low, participant_high, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(conversation.id)
        .bind(conversation.participant_low)
        .bind(conversation.participant_high)
        .bind(conversation.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn find_by_participants(&self, low: Uuid, high: Uuid) -> StoreResult<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(
            "SELECT id, participant_low, participant_high, created_at
             FROM conversations
             WHERE participant_low = $1 AND participant_high = $2",
        )
        .bind(low)
        .bind(high)
        .fetch_optional(self.pool())
        .await?;
        Ok(conversation)
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Conversation>> {
        let conversations = sqlx::query_as::<_, Conversation>(
            "SELECT id, participant_low, participant_high, created_at
             FROM conversations
             WHERE participant_low = $1 OR participant_high = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(conversations)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(
            "SELECT id, participant_low, participant_high, created_at
             FROM conversations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(conversation)
    }
}
