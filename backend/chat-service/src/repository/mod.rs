//! Store traits consumed by the messaging and room engines
//!
//! Engines only see these traits; `postgres` backs them with sqlx and
//! `memory` with in-process maps for tests and local runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Conversation, Message, Room, RoomMembership, RoomMessage, RoomRole, User};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write; carries the constraint name
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// An update or delete touched no row
    #[error("row not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// A stored value could not be mapped back to a domain type
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(
                    db_err.constraint().unwrap_or("unknown").to_string(),
                );
            }
        }
        StoreError::Database(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Identity directory
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> StoreResult<()>;

    async fn update(&self, user: &User) -> StoreResult<()>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_by_phone(&self, phone: &str) -> StoreResult<Option<User>>;

    /// `handle` includes the leading '@'
    async fn find_by_handle(&self, handle: &str) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Fails with `UniqueViolation` when the pair already has a conversation
    async fn create(&self, conversation: &Conversation) -> StoreResult<()>;

    /// Expects the pair in canonical order
    async fn find_by_participants(&self, low: Uuid, high: Uuid) -> StoreResult<Option<Conversation>>;

    /// Conversations the user takes part in, newest first
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Conversation>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Conversation>>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> StoreResult<()>;

    async fn update(&self, message: &Message) -> StoreResult<()>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Oldest first
    async fn find_by_conversation(&self, conversation_id: Uuid) -> StoreResult<Vec<Message>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Message>>;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: &Room) -> StoreResult<()>;

    async fn update(&self, room: &Room) -> StoreResult<()>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Room>>;

    async fn find_by_handle(&self, handle: &str) -> StoreResult<Option<Room>>;
}

#[async_trait]
pub trait RoomMembershipRepository: Send + Sync {
    async fn add_member(&self, membership: &RoomMembership) -> StoreResult<()>;

    async fn update_member_role(&self, room_id: Uuid, user_id: Uuid, role: RoomRole) -> StoreResult<()>;

    async fn remove_member(&self, room_id: Uuid, user_id: Uuid) -> StoreResult<()>;

    async fn get_members(&self, room_id: Uuid) -> StoreResult<Vec<RoomMembership>>;

    /// `None` when the user has no membership row; absence is not an error
    async fn get_member_role(&self, room_id: Uuid, user_id: Uuid) -> StoreResult<Option<RoomRole>>;
}

#[async_trait]
pub trait RoomMessageRepository: Send + Sync {
    async fn create(&self, message: &RoomMessage) -> StoreResult<()>;

    async fn delete(&self, id: Uuid) -> StoreResult<()>;

    /// Oldest first
    async fn find_by_room(&self, room_id: Uuid) -> StoreResult<Vec<RoomMessage>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<RoomMessage>>;
}

/// Every store the service needs, behind trait objects
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub memberships: Arc<dyn RoomMembershipRepository>,
    pub room_messages: Arc<dyn RoomMessageRepository>,
}

impl Repositories {
    /// Use one backing store for every repository
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + ConversationRepository
            + MessageRepository
            + RoomRepository
            + RoomMembershipRepository
            + RoomMessageRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            conversations: store.clone(),
            messages: store.clone(),
            rooms: store.clone(),
            memberships: store.clone(),
            room_messages: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }
}
