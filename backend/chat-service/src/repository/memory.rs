//! In-process store used by the test suites and `STORE=memory` runs.
//!
//! Mirrors the PostgreSQL schema's unique constraints (reporting the same
//! constraint names) and its `ON DELETE CASCADE` foreign keys.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    ConversationRepository, MessageRepository, RoomMembershipRepository, RoomMessageRepository,
    RoomRepository, StoreError, StoreResult, UserRepository,
};
use crate::models::{Conversation, Message, Room, RoomMembership, RoomMessage, RoomRole, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    // Vecs keep insertion order so equal timestamps sort deterministically
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    rooms: HashMap<Uuid, Room>,
    memberships: Vec<RoomMembership>,
    room_messages: Vec<RoomMessage>,
}

impl Tables {
    fn purge_room(&mut self, room_id: Uuid) {
        self.memberships.retain(|m| m.room_id != room_id);
        self.room_messages.retain(|m| m.room_id != room_id);
    }

    fn purge_user(&mut self, user_id: Uuid) {
        let conversation_ids: Vec<Uuid> = self
            .conversations
            .iter()
            .filter(|c| c.includes(user_id))
            .map(|c| c.id)
            .collect();
        self.conversations.retain(|c| !c.includes(user_id));
        self.messages.retain(|m| {
            m.sender_id != user_id && !conversation_ids.contains(&m.conversation_id)
        });

        let owned_rooms: Vec<Uuid> = self
            .rooms
            .values()
            .filter(|r| r.owner_id == user_id)
            .map(|r| r.id)
            .collect();
        for room_id in owned_rooms {
            self.rooms.remove(&room_id);
            self.purge_room(room_id);
        }
        self.memberships.retain(|m| m.user_id != user_id);
        self.room_messages.retain(|m| m.sender_id != user_id);
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unique(constraint: &str) -> StoreError {
    StoreError::UniqueViolation(constraint.to_string())
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(unique("users_pkey"));
        }
        if tables.users.values().any(|u| u.phone == user.phone) {
            return Err(unique("users_phone_key"));
        }
        if user.handle.is_some() && tables.users.values().any(|u| u.handle == user.handle) {
            return Err(unique("users_handle_key"));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        let others = tables.users.values().filter(|u| u.id != user.id);
        for other in others {
            if other.phone == user.phone {
                return Err(unique("users_phone_key"));
            }
            if user.handle.is_some() && other.handle == user.handle {
                return Err(unique("users_handle_key"));
            }
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(StoreError::NotFound)?;
        tables.purge_user(id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.phone == phone).cloned())
    }

    async fn find_by_handle(&self, handle: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.handle.as_deref() == Some(handle))
            .cloned())
    }
}

#[async_trait]
impl ConversationRepository for InMemoryStore {
    async fn create(&self, conversation: &Conversation) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if conversation.participant_low > conversation.participant_high {
            return Err(StoreError::Corrupt(
                "conversation participants must be in canonical order".into(),
            ));
        }
        if tables.conversations.iter().any(|c| {
            c.participant_low == conversation.participant_low
                && c.participant_high == conversation.participant_high
        }) {
            return Err(unique("conversations_participants_key"));
        }
        tables.conversations.push(conversation.clone());
        Ok(())
    }

    async fn find_by_participants(&self, low: Uuid, high: Uuid) -> StoreResult<Option<Conversation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .conversations
            .iter()
            .find(|c| c.participant_low == low && c.participant_high == high)
            .cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Conversation>> {
        let tables = self.tables.read().await;
        let mut conversations: Vec<Conversation> = tables
            .conversations
            .iter()
            .rev()
            .filter(|c| c.includes(user_id))
            .cloned()
            .collect();
        conversations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(conversations)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Conversation>> {
        let tables = self.tables.read().await;
        Ok(tables.conversations.iter().find(|c| c.id == id).cloned())
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn create(&self, message: &Message) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.messages.iter().any(|m| m.id == message.id) {
            return Err(unique("messages_pkey"));
        }
        tables.messages.push(message.clone());
        Ok(())
    }

    async fn update(&self, message: &Message) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .messages
            .iter_mut()
            .find(|m| m.id == message.id)
            .ok_or(StoreError::NotFound)?;
        stored.content = message.content.clone();
        stored.updated_at = message.updated_at;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.messages.len();
        tables.messages.retain(|m| m.id != id);
        if tables.messages.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn find_by_conversation(&self, conversation_id: Uuid) -> StoreResult<Vec<Message>> {
        let tables = self.tables.read().await;
        let mut messages: Vec<Message> = tables
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Message>> {
        let tables = self.tables.read().await;
        Ok(tables.messages.iter().find(|m| m.id == id).cloned())
    }
}

#[async_trait]
impl RoomRepository for InMemoryStore {
    async fn create(&self, room: &Room) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.rooms.contains_key(&room.id) {
            return Err(unique("rooms_pkey"));
        }
        if room.handle.is_some() && tables.rooms.values().any(|r| r.handle == room.handle) {
            return Err(unique("rooms_handle_key"));
        }
        tables.rooms.insert(room.id, room.clone());
        Ok(())
    }

    async fn update(&self, room: &Room) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.rooms.contains_key(&room.id) {
            return Err(StoreError::NotFound);
        }
        if room.handle.is_some()
            && tables
                .rooms
                .values()
                .any(|r| r.id != room.id && r.handle == room.handle)
        {
            return Err(unique("rooms_handle_key"));
        }
        tables.rooms.insert(room.id, room.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.rooms.remove(&id).ok_or(StoreError::NotFound)?;
        tables.purge_room(id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Room>> {
        Ok(self.tables.read().await.rooms.get(&id).cloned())
    }

    async fn find_by_handle(&self, handle: &str) -> StoreResult<Option<Room>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rooms
            .values()
            .find(|r| r.handle.as_deref() == Some(handle))
            .cloned())
    }
}

#[async_trait]
impl RoomMembershipRepository for InMemoryStore {
    async fn add_member(&self, membership: &RoomMembership) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .memberships
            .iter()
            .any(|m| m.room_id == membership.room_id && m.user_id == membership.user_id)
        {
            return Err(unique("room_memberships_pkey"));
        }
        tables.memberships.push(membership.clone());
        Ok(())
    }

    async fn update_member_role(&self, room_id: Uuid, user_id: Uuid, role: RoomRole) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let membership = tables
            .memberships
            .iter_mut()
            .find(|m| m.room_id == room_id && m.user_id == user_id)
            .ok_or(StoreError::NotFound)?;
        membership.role = role;
        Ok(())
    }

    async fn remove_member(&self, room_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.memberships.len();
        tables
            .memberships
            .retain(|m| !(m.room_id == room_id && m.user_id == user_id));
        if tables.memberships.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn get_members(&self, room_id: Uuid) -> StoreResult<Vec<RoomMembership>> {
        let tables = self.tables.read().await;
        let mut members: Vec<RoomMembership> = tables
            .memberships
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(members)
    }

    async fn get_member_role(&self, room_id: Uuid, user_id: Uuid) -> StoreResult<Option<RoomRole>> {
        let tables = self.tables.read().await;
        Ok(tables
            .memberships
            .iter()
            .find(|m| m.room_id == room_id && m.user_id == user_id)
            .map(|m| m.role))
    }
}

#[async_trait]
impl RoomMessageRepository for InMemoryStore {
    async fn create(&self, message: &RoomMessage) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.room_messages.iter().any(|m| m.id == message.id) {
            return Err(unique("room_messages_pkey"));
        }
        tables.room_messages.push(message.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.room_messages.len();
        tables.room_messages.retain(|m| m.id != id);
        if tables.room_messages.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn find_by_room(&self, room_id: Uuid) -> StoreResult<Vec<RoomMessage>> {
        let tables = self.tables.read().await;
        let mut messages: Vec<RoomMessage> = tables
            .room_messages
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<RoomMessage>> {
        let tables = self.tables.read().await;
        Ok(tables.room_messages.iter().find(|m| m.id == id).cloned())
    }
}
