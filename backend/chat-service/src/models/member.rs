//! Room roles and the permission matrix
//!
//! Roles have a natural ordering: Banned < Member < Admin < Owner.
//! Banned is terminal until an owner or admin lifts it; a banned user passes
//! no check that a plain member would pass.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::room::RoomType;

/// Member role in a room with natural hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomRole {
    /// Kept in the room but cannot take part
    Banned = 0,
    /// Regular member
    Member = 1,
    /// Can manage the room and its members, except promotions
    Admin = 2,
    /// Full control
    Owner = 3,
}

impl RoomRole {
    pub const ALL: [RoomRole; 4] = [
        RoomRole::Owner,
        RoomRole::Admin,
        RoomRole::Member,
        RoomRole::Banned,
    ];

    /// Parse role from database string
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "banned" => Some(Self::Banned),
            "member" => Some(Self::Member),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Convert role to database string
    pub fn to_db(&self) -> &'static str {
        match self {
            Self::Banned => "banned",
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    pub fn is_banned(&self) -> bool {
        *self == RoomRole::Banned
    }
}

impl fmt::Display for RoomRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db())
    }
}

/// Parse from string (for API requests)
impl std::str::FromStr for RoomRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db(s).ok_or_else(|| format!("Invalid role: {}", s))
    }
}

/// Actions gated by the permission matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomAction {
    UpdateRoom,
    DeleteRoom,
    AddMember,
    /// Removing someone other than yourself
    RemoveMember,
    PromoteMember,
    /// Ban or unban
    ModerateMember,
    SendMessage,
    /// Deleting someone else's message
    DeleteMessage,
}

impl RoomAction {
    pub const ALL: [RoomAction; 8] = [
        RoomAction::UpdateRoom,
        RoomAction::DeleteRoom,
        RoomAction::AddMember,
        RoomAction::RemoveMember,
        RoomAction::PromoteMember,
        RoomAction::ModerateMember,
        RoomAction::SendMessage,
        RoomAction::DeleteMessage,
    ];
}

/// Decide whether a requester holding `role` (or no membership at all) may
/// perform `action` in a room of `room_type`.
///
/// Non-members are treated like members in groups for inviting and posting;
/// the room engine does not require membership for those two actions.
pub fn permits(role: Option<RoomRole>, action: RoomAction, room_type: RoomType) -> bool {
    use RoomAction::*;

    match role {
        Some(RoomRole::Owner) => true,
        Some(RoomRole::Admin) => action != PromoteMember,
        Some(RoomRole::Banned) => false,
        Some(RoomRole::Member) | None => {
            matches!(action, AddMember | SendMessage) && room_type == RoomType::Group
        }
    }
}
