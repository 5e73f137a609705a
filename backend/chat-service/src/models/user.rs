use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    /// Always stored with a leading '@'
    pub handle: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Whether a recipient identifier names a handle rather than a phone number
pub fn is_handle(identifier: &str) -> bool {
    identifier.starts_with('@')
}

/// Trim a user supplied handle and make sure it carries exactly one leading '@'.
///
/// Returns `None` for blank input.
pub fn normalize_handle(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('@');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("@{}", trimmed))
}
