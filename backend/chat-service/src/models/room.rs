//! Rooms: multi-party groups and broadcast channels

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::member::RoomRole;

/// Kind of room
///
/// In a group every participant may post and invite; in a channel only the
/// owner and admins may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Group,
    Channel,
}

impl RoomType {
    pub const ALL: [RoomType; 2] = [RoomType::Group, RoomType::Channel];

    /// Parse room type from database string
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "group" => Some(Self::Group),
            "channel" => Some(Self::Channel),
            _ => None,
        }
    }

    /// Convert room type to database string
    pub fn to_db(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Channel => "channel",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db())
    }
}

impl std::str::FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db(s).ok_or_else(|| format!("Invalid room type: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub handle: Option<String>,
    pub room_type: RoomType,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn new(owner_id: Uuid, name: String, handle: Option<String>, room_type: RoomType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            handle,
            room_type,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One row per (room, user). A missing row means the user is not a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMembership {
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub role: RoomRole,
    pub created_at: DateTime<Utc>,
}

impl RoomMembership {
    pub fn new(room_id: Uuid, user_id: Uuid, role: RoomRole) -> Self {
        Self {
            room_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoomMessage {
    pub id: Uuid,
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoomMessage {
    pub fn new(room_id: Uuid, sender_id: Uuid, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            room_id,
            sender_id,
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
