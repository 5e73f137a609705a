use async_trait::async_trait;
use uuid::Uuid;

use super::{expect_affected, PgStore};
use crate::models::User;
use crate::repository::{StoreResult, UserRepository};

const USER_COLUMNS: &str = "id, name, phone, handle, password_hash, created_at";

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (id, name, phone, handle, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.handle)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn update(&self, user: &User) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, phone = $3, handle = $4, password_hash = $5
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.handle)
        .bind(&user.password_hash)
        .execute(self.pool())
        .await?;
        expect_affected(result)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        expect_affected(result)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }

    async fn find_by_phone(&self, phone: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }

    async fn find_by_handle(&self, handle: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE handle = $1"
        ))
        .bind(handle)
        .fetch_optional(self.pool())
        .await?;
        Ok(user)
    }
}
