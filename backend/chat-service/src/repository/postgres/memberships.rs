use async_trait::async_trait;
use uuid::Uuid;

use super::{expect_affected, parse_role, MembershipRow, PgStore};
use crate::models::{RoomMembership, RoomRole};
use crate::repository::{RoomMembershipRepository, StoreResult};

#[async_trait]
impl RoomMembershipRepository for PgStore {
    async fn add_member(&self, membership: &RoomMembership) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO room_memberships (room_id, user_id, role, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(membership.room_id)
        .bind(membership.user_id)
        .bind(membership.role.to_db())
        .bind(membership.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn update_member_role(&self, room_id: Uuid, user_id: Uuid, role: RoomRole) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE room_memberships SET role = $3 WHERE room_id = $1 AND user_id = $2",
        )
        .bind(room_id)
        .bind(user_id)
        .bind(role.to_db())
        .execute(self.pool())
        .await?;
        expect_affected(result)
    }

    async fn remove_member(&self, room_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM room_memberships WHERE room_id = $1 AND user_id = $2")
            .bind(room_id)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        expect_affected(result)
    }

    async fn get_members(&self, room_id: Uuid) -> StoreResult<Vec<RoomMembership>> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            "SELECT room_id, user_id, role, created_at
             FROM room_memberships
             WHERE room_id = $1
             ORDER BY created_at ASC, user_id ASC",
        )
        .bind(room_id)
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(RoomMembership::try_from).collect()
    }

    async fn get_member_role(&self, room_id: Uuid, user_id: Uuid) -> StoreResult<Option<RoomRole>> {
        let role: Option<String> = sqlx::query_scalar(
            "SELECT role FROM room_memberships WHERE room_id = $1 AND user_id = $2",
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        role.as_deref().map(parse_role).transpose()
    }
}
