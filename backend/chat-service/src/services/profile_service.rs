//! Read, update and delete the caller's own profile

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::auth_service::user_conflict;
use crate::error::{AppError, AppResult};
use crate::models::user::normalize_handle;
use crate::models::User;
use crate::repository::{StoreError, UserRepository};
use crate::security::password;

/// Fields a user may change; `None` or blank leaves the value as is
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub handle: Option<String>,
    pub password: Option<String>,
}

pub struct ProfileService {
    users: Arc<dyn UserRepository>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let mut user = self.get_profile(user_id).await?;

        if let Some(name) = non_blank(update.name.as_deref()) {
            user.name = name.to_string();
        }

        if let Some(handle) = update.handle.as_deref().and_then(normalize_handle) {
            if let Some(owner) = self.users.find_by_handle(&handle).await? {
                if owner.id != user.id {
                    return Err(AppError::Conflict(format!("handle {} is already taken", handle)));
                }
            }
            user.handle = Some(handle);
        }

        if let Some(raw) = update.password.as_deref().filter(|p| !p.is_empty()) {
            user.password_hash = password::hash_password(raw)?;
        }

        self.users.update(&user).await.map_err(|e| match e {
            StoreError::NotFound => AppError::UserNotFound,
            other => user_conflict(other),
        })?;

        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    pub async fn delete_profile(&self, user_id: Uuid) -> AppResult<()> {
        self.users.delete(user_id).await.map_err(|e| match e {
            StoreError::NotFound => AppError::UserNotFound,
            other => other.into(),
        })?;

        info!(user_id = %user_id, "profile deleted");
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
