//! Shared fixtures for chat-service integration tests

#![allow(dead_code)]

use chat_service::models::User;
use chat_service::repository::{InMemoryStore, UserRepository};
use chrono::Utc;
use uuid::Uuid;

/// Insert a user directly into the store, skipping password hashing
pub async fn seed_user(store: &InMemoryStore, name: &str, phone: &str, handle: Option<&str>) -> User {
    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        phone: phone.to_string(),
        handle: handle.map(str::to_string),
        password_hash: String::new(),
        created_at: Utc::now(),
    };
    UserRepository::create(store, &user)
        .await
        .expect("seed user");
    user
}
