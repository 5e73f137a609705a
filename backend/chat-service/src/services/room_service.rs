//! Room engine: lifecycle, membership roles and room messages
//!
//! Every decision is made from freshly read store state; the permission
//! matrix in `models::member::permits` is the single source of truth for
//! who may do what.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::normalize_handle;
use crate::models::{
    permits, Room, RoomAction, RoomMembership, RoomMessage, RoomRole, RoomType,
};
use crate::repository::{
    Repositories, RoomMembershipRepository, RoomMessageRepository, RoomRepository, StoreError,
    UserRepository,
};

pub struct RoomService {
    users: Arc<dyn UserRepository>,
    rooms: Arc<dyn RoomRepository>,
    memberships: Arc<dyn RoomMembershipRepository>,
    room_messages: Arc<dyn RoomMessageRepository>,
}

impl RoomService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        rooms: Arc<dyn RoomRepository>,
        memberships: Arc<dyn RoomMembershipRepository>,
        room_messages: Arc<dyn RoomMessageRepository>,
    ) -> Self {
        Self {
            users,
            rooms,
            memberships,
            room_messages,
        }
    }

    pub fn from_repositories(repos: &Repositories) -> Self {
        Self::new(
            repos.users.clone(),
            repos.rooms.clone(),
            repos.memberships.clone(),
            repos.room_messages.clone(),
        )
    }

    // ------------------------------------------------------------------
    // Room lifecycle
    // ------------------------------------------------------------------

    /// Create a room owned by `owner_id`
    ///
    /// If the owner membership cannot be written the room row is deleted
    /// again and the store failure is returned.
    pub async fn create_room(
        &self,
        owner_id: Uuid,
        name: &str,
        handle: Option<&str>,
        room_type: RoomType,
    ) -> AppResult<Room> {
        let name = require_name(name)?;
        let handle = handle.and_then(normalize_handle);

        if let Some(handle) = handle.as_deref() {
            if self.rooms.find_by_handle(handle).await?.is_some() {
                return Err(AppError::Conflict(format!("room handle {} is already taken", handle)));
            }
        }

        let room = Room::new(owner_id, name, handle, room_type);
        self.rooms.create(&room).await.map_err(handle_conflict)?;

        let owner = RoomMembership::new(room.id, owner_id, RoomRole::Owner);
        if let Err(e) = self.memberships.add_member(&owner).await {
            error!(room_id = %room.id, error = %e, "owner membership insert failed, removing room");
            if let Err(cleanup) = self.rooms.delete(room.id).await {
                error!(room_id = %room.id, error = %cleanup, "failed to remove room without owner");
            }
            return Err(e.into());
        }

        info!(room_id = %room.id, owner_id = %owner_id, room_type = %room_type, "room created");
        Ok(room)
    }

    pub async fn get_room(&self, room_id: Uuid) -> AppResult<Room> {
        self.load_room(room_id).await
    }

    pub async fn find_room_by_handle(&self, handle: &str) -> AppResult<Room> {
        let handle = normalize_handle(handle).ok_or(AppError::RoomNotFound)?;
        self.rooms
            .find_by_handle(&handle)
            .await?
            .ok_or(AppError::RoomNotFound)
    }

    /// Rename a room and optionally change its handle; a blank handle keeps
    /// the current one
    pub async fn update_room(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
        name: &str,
        handle: Option<&str>,
    ) -> AppResult<Room> {
        let mut room = self.load_room(room_id).await?;
        self.authorize(&room, requester_id, RoomAction::UpdateRoom).await?;

        room.name = require_name(name)?;

        if let Some(handle) = handle.and_then(normalize_handle) {
            if let Some(other) = self.rooms.find_by_handle(&handle).await? {
                if other.id != room.id {
                    return Err(AppError::Conflict(format!(
                        "room handle {} is already taken",
                        handle
                    )));
                }
            }
            room.handle = Some(handle);
        }

        room.updated_at = Utc::now();
        self.rooms.update(&room).await.map_err(|e| match e {
            StoreError::NotFound => AppError::RoomNotFound,
            other => handle_conflict(other),
        })?;

        info!(room_id = %room.id, requester_id = %requester_id, "room updated");
        Ok(room)
    }

    /// Delete the room row
    pub async fn delete_room(&self, room_id: Uuid, requester_id: Uuid) -> AppResult<()> {
        let room = self.load_room(room_id).await?;
        self.authorize(&room, requester_id, RoomAction::DeleteRoom).await?;

        self.rooms.delete(room.id).await.map_err(|e| match e {
            StoreError::NotFound => AppError::RoomNotFound,
            other => other.into(),
        })?;

        info!(room_id = %room.id, requester_id = %requester_id, "room deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------

    pub async fn add_member(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
        target_user_id: Uuid,
    ) -> AppResult<RoomMembership> {
        let room = self.load_room(room_id).await?;

        self.users
            .find_by_id(target_user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        // Any existing row counts, including a ban
        if self
            .memberships
            .get_member_role(room.id, target_user_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyMember);
        }

        let requester_role = self.memberships.get_member_role(room.id, requester_id).await?;
        if requester_role.is_some_and(|r| r.is_banned()) {
            return Err(AppError::Banned);
        }
        if !permits(requester_role, RoomAction::AddMember, room.room_type) {
            return Err(AppError::Unauthorized);
        }

        let membership = RoomMembership::new(room.id, target_user_id, RoomRole::Member);
        self.memberships
            .add_member(&membership)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => AppError::AlreadyMember,
                other => other.into(),
            })?;

        info!(
            room_id = %room.id,
            requester_id = %requester_id,
            user_id = %target_user_id,
            "member added"
        );
        Ok(membership)
    }

    /// Remove a membership. Leaving needs no role and is always allowed;
    /// removing someone else needs owner or admin, and the owner cannot be
    /// removed by others.
    pub async fn remove_member(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
        target_user_id: Uuid,
    ) -> AppResult<()> {
        let room = self.load_room(room_id).await?;
        let is_self = requester_id == target_user_id;

        if !is_self {
            self.authorize(&room, requester_id, RoomAction::RemoveMember).await?;

            let target_role = self.target_role(&room, target_user_id).await?;
            if target_role == RoomRole::Owner {
                return Err(AppError::InvalidRoleTransition(
                    "the room owner cannot be removed by others".into(),
                ));
            }
        }

        self.memberships
            .remove_member(room.id, target_user_id)
            .await
            .map_err(membership_missing)?;

        info!(
            room_id = %room.id,
            requester_id = %requester_id,
            user_id = %target_user_id,
            "member removed"
        );
        Ok(())
    }

    /// Owner-only: member -> admin
    pub async fn promote_member(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
        target_user_id: Uuid,
    ) -> AppResult<()> {
        let room = self.load_room(room_id).await?;
        self.authorize(&room, requester_id, RoomAction::PromoteMember).await?;

        let target_role = self.target_role(&room, target_user_id).await?;
        if target_role != RoomRole::Member {
            return Err(AppError::InvalidRoleTransition(format!(
                "only members can be promoted, target is {}",
                target_role
            )));
        }

        self.set_role(&room, target_user_id, RoomRole::Admin).await?;
        info!(room_id = %room.id, user_id = %target_user_id, "member promoted to admin");
        Ok(())
    }

    /// Owner or admin: any non-owner membership -> banned. The row is kept so
    /// the ban survives until lifted.
    pub async fn ban_member(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
        target_user_id: Uuid,
    ) -> AppResult<()> {
        let room = self.load_room(room_id).await?;
        self.authorize(&room, requester_id, RoomAction::ModerateMember).await?;

        match self.target_role(&room, target_user_id).await? {
            RoomRole::Owner => {
                return Err(AppError::InvalidRoleTransition(
                    "the room owner cannot be banned".into(),
                ))
            }
            RoomRole::Banned => {
                return Err(AppError::InvalidRoleTransition("member is already banned".into()))
            }
            RoomRole::Admin | RoomRole::Member => {}
        }

        self.set_role(&room, target_user_id, RoomRole::Banned).await?;
        info!(
            room_id = %room.id,
            requester_id = %requester_id,
            user_id = %target_user_id,
            "member banned"
        );
        Ok(())
    }

    /// Owner or admin: banned -> member
    pub async fn unban_member(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
        target_user_id: Uuid,
    ) -> AppResult<()> {
        let room = self.load_room(room_id).await?;
        self.authorize(&room, requester_id, RoomAction::ModerateMember).await?;

        let target_role = self.target_role(&room, target_user_id).await?;
        if !target_role.is_banned() {
            return Err(AppError::InvalidRoleTransition(format!(
                "only banned members can be unbanned, target is {}",
                target_role
            )));
        }

        self.set_role(&room, target_user_id, RoomRole::Member).await?;
        info!(
            room_id = %room.id,
            requester_id = %requester_id,
            user_id = %target_user_id,
            "member unbanned"
        );
        Ok(())
    }

    pub async fn get_members(&self, room_id: Uuid) -> AppResult<Vec<RoomMembership>> {
        let room = self.load_room(room_id).await?;
        Ok(self.memberships.get_members(room.id).await?)
    }

    // ------------------------------------------------------------------
    // Room messages
    // ------------------------------------------------------------------

    /// Post to a room. Checked in order: ban, room existence, channel gating.
    pub async fn send_message(
        &self,
        room_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> AppResult<RoomMessage> {
        if content.trim().is_empty() {
            return Err(AppError::BadRequest("message content must not be empty".into()));
        }

        let role = self.memberships.get_member_role(room_id, sender_id).await?;
        if role.is_some_and(|r| r.is_banned()) {
            return Err(AppError::Banned);
        }

        let room = self.load_room(room_id).await?;
        if !permits(role, RoomAction::SendMessage, room.room_type) {
            return Err(AppError::Unauthorized);
        }

        let message = RoomMessage::new(room.id, sender_id, content);
        self.room_messages.create(&message).await?;
        Ok(message)
    }

    /// Delete a room message; its sender may always do so, others need owner
    /// or admin
    pub async fn delete_message(
        &self,
        room_id: Uuid,
        requester_id: Uuid,
        message_id: Uuid,
    ) -> AppResult<()> {
        let room = self.load_room(room_id).await?;

        let message = self
            .room_messages
            .find_by_id(message_id)
            .await?
            .filter(|m| m.room_id == room.id)
            .ok_or(AppError::MessageNotFound)?;

        if message.sender_id != requester_id {
            self.authorize(&room, requester_id, RoomAction::DeleteMessage).await?;
        }

        self.room_messages.delete(message.id).await.map_err(|e| match e {
            StoreError::NotFound => AppError::MessageNotFound,
            other => other.into(),
        })?;

        info!(
            room_id = %room.id,
            message_id = %message.id,
            requester_id = %requester_id,
            "room message deleted"
        );
        Ok(())
    }

    /// Messages of a room, oldest first
    pub async fn get_messages(&self, room_id: Uuid) -> AppResult<Vec<RoomMessage>> {
        let room = self.load_room(room_id).await?;
        Ok(self.room_messages.find_by_room(room.id).await?)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    async fn load_room(&self, room_id: Uuid) -> AppResult<Room> {
        self.rooms
            .find_by_id(room_id)
            .await?
            .ok_or(AppError::RoomNotFound)
    }

    async fn authorize(&self, room: &Room, requester_id: Uuid, action: RoomAction) -> AppResult<()> {
        let role = self.memberships.get_member_role(room.id, requester_id).await?;
        if permits(role, action, room.room_type) {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }

    async fn target_role(&self, room: &Room, user_id: Uuid) -> AppResult<RoomRole> {
        self.memberships
            .get_member_role(room.id, user_id)
            .await?
            .ok_or(AppError::MembershipNotFound)
    }

    async fn set_role(&self, room: &Room, user_id: Uuid, role: RoomRole) -> AppResult<()> {
        self.memberships
            .update_member_role(room.id, user_id, role)
            .await
            .map_err(membership_missing)
    }
}

fn require_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("room name is required".into()));
    }
    Ok(name.to_string())
}

fn handle_conflict(e: StoreError) -> AppError {
    match e {
        StoreError::UniqueViolation(constraint) if constraint == "rooms_handle_key" => {
            AppError::Conflict("room handle is already taken".into())
        }
        other => other.into(),
    }
}

fn membership_missing(e: StoreError) -> AppError {
    match e {
        StoreError::NotFound => AppError::MembershipNotFound,
        other => other.into(),
    }
}
