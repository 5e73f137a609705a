//! Registration and login

use chrono::Utc;
use crypto_core::jwt::{self, TokenResponse};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::normalize_handle;
use crate::models::User;
use crate::repository::{StoreError, UserRepository};
use crate::security::password;

const INVALID_CREDENTIALS: &str = "invalid credentials";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create an account. The handle, when given, is stored with a leading '@'.
    pub async fn register(
        &self,
        name: &str,
        phone: &str,
        handle: Option<&str>,
        raw_password: &str,
    ) -> AppResult<User> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("name is required".into()));
        }
        if phone.is_empty() {
            return Err(AppError::BadRequest("phone is required".into()));
        }
        password::validate_password(raw_password)?;

        if self.users.find_by_phone(phone).await?.is_some() {
            return Err(AppError::Conflict("phone number is already registered".into()));
        }

        let handle = handle.and_then(normalize_handle);
        if let Some(handle) = handle.as_deref() {
            if self.users.find_by_handle(handle).await?.is_some() {
                return Err(AppError::Conflict(format!("handle {} is already taken", handle)));
            }
        }

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: phone.to_string(),
            handle,
            password_hash: password::hash_password(raw_password)?,
            created_at: Utc::now(),
        };

        self.users.create(&user).await.map_err(user_conflict)?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Check credentials and issue an access token
    pub async fn login(&self, phone: &str, raw_password: &str) -> AppResult<TokenResponse> {
        let user = match self.users.find_by_phone(phone.trim()).await? {
            Some(user) => user,
            None => {
                password::verify_against_dummy(raw_password);
                warn!("login attempt for unknown phone");
                return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()));
            }
        };

        if !password::verify_password(raw_password, &user.password_hash)? {
            warn!(user_id = %user.id, "login attempt with wrong password");
            return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()));
        }

        let token = jwt::generate_token_response(user.id, user.handle.as_deref()).map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "token generation failed");
            AppError::Internal
        })?;

        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }
}

/// Translate a unique violation on the users table into a readable conflict
pub(crate) fn user_conflict(e: StoreError) -> AppError {
    match e {
        StoreError::UniqueViolation(constraint) => match constraint.as_str() {
            "users_phone_key" => AppError::Conflict("phone number is already registered".into()),
            "users_handle_key" => AppError::Conflict("handle is already taken".into()),
            _ => AppError::Store(StoreError::UniqueViolation(constraint)),
        },
        other => other.into(),
    }
}
