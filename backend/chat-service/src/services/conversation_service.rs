//! Direct messaging engine
//!
//! Maps every pair of users onto a single conversation and enforces that only
//! a message's sender may edit or delete it.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::is_handle;
use crate::models::{canonical_pair, Conversation, Message, User};
use crate::repository::{
    ConversationRepository, MessageRepository, Repositories, StoreError, UserRepository,
};

pub struct ConversationService {
    users: Arc<dyn UserRepository>,
    conversations: Arc<dyn ConversationRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl ConversationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        conversations: Arc<dyn ConversationRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            users,
            conversations,
            messages,
        }
    }

    pub fn from_repositories(repos: &Repositories) -> Self {
        Self::new(
            repos.users.clone(),
            repos.conversations.clone(),
            repos.messages.clone(),
        )
    }

    /// Send `content` from `sender_id` to the user named by `recipient`.
    ///
    /// `recipient` is a handle when it starts with '@', otherwise a phone
    /// number. The pair's conversation is created on first contact; a user
    /// writing to themselves gets a conversation of their own.
    pub async fn send_message(
        &self,
        sender_id: Uuid,
        recipient: &str,
        content: &str,
    ) -> AppResult<Message> {
        require_content(content)?;

        let recipient = self.resolve_recipient(recipient).await?;
        let conversation = self.find_or_create_conversation(sender_id, recipient.id).await?;

        let message = Message::new(conversation.id, sender_id, content);
        self.messages.create(&message).await?;

        debug!(
            conversation_id = %conversation.id,
            message_id = %message.id,
            sender_id = %sender_id,
            "direct message stored"
        );
        Ok(message)
    }

    /// Conversations the user takes part in, newest first
    pub async fn get_conversations(&self, user_id: Uuid) -> AppResult<Vec<Conversation>> {
        Ok(self.conversations.find_by_user(user_id).await?)
    }

    /// Messages of a conversation, oldest first
    pub async fn get_messages(&self, conversation_id: Uuid) -> AppResult<Vec<Message>> {
        self.conversations
            .find_by_id(conversation_id)
            .await?
            .ok_or(AppError::ConversationNotFound)?;

        Ok(self.messages.find_by_conversation(conversation_id).await?)
    }

    pub async fn update_message(
        &self,
        requester_id: Uuid,
        message_id: Uuid,
        content: &str,
    ) -> AppResult<Message> {
        require_content(content)?;

        let mut message = self.owned_message(requester_id, message_id).await?;
        message.content = content.to_string();
        message.updated_at = Utc::now();

        self.messages.update(&message).await.map_err(|e| match e {
            StoreError::NotFound => AppError::MessageNotFound,
            other => other.into(),
        })?;
        Ok(message)
    }

    pub async fn delete_message(&self, requester_id: Uuid, message_id: Uuid) -> AppResult<()> {
        self.owned_message(requester_id, message_id).await?;

        self.messages.delete(message_id).await.map_err(|e| match e {
            StoreError::NotFound => AppError::MessageNotFound,
            other => other.into(),
        })?;
        info!(message_id = %message_id, requester_id = %requester_id, "direct message deleted");
        Ok(())
    }

    async fn resolve_recipient(&self, identifier: &str) -> AppResult<User> {
        let identifier = identifier.trim();
        let user = if is_handle(identifier) {
            self.users.find_by_handle(identifier).await?
        } else {
            self.users.find_by_phone(identifier).await?
        };
        user.ok_or(AppError::RecipientNotFound)
    }

    /// Look up the pair's conversation, creating it when absent.
    ///
    /// Two first messages racing each other both miss the lookup; the loser's
    /// insert hits the unique constraint and re-reads the winner's row once.
    async fn find_or_create_conversation(&self, a: Uuid, b: Uuid) -> AppResult<Conversation> {
        let (low, high) = canonical_pair(a, b);

        if let Some(existing) = self.conversations.find_by_participants(low, high).await? {
            return Ok(existing);
        }

        let conversation = Conversation::new(low, high);
        match self.conversations.create(&conversation).await {
            Ok(()) => {
                info!(conversation_id = %conversation.id, "conversation created");
                Ok(conversation)
            }
            Err(e) if e.is_unique_violation() => {
                warn!(
                    participant_low = %low,
                    participant_high = %high,
                    "conversation created concurrently, re-reading"
                );
                self.conversations
                    .find_by_participants(low, high)
                    .await?
                    .ok_or(AppError::Store(e))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn owned_message(&self, requester_id: Uuid, message_id: Uuid) -> AppResult<Message> {
        let message = self
            .messages
            .find_by_id(message_id)
            .await?
            .ok_or(AppError::MessageNotFound)?;

        if !message.is_sent_by(requester_id) {
            return Err(AppError::Unauthorized);
        }
        Ok(message)
    }
}

fn require_content(content: &str) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::BadRequest("message content must not be empty".into()));
    }
    Ok(())
}
