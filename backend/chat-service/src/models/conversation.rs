use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direct conversation between two users, or a user and themselves.
///
/// `participant_low <= participant_high` always holds, so an unordered pair
/// of users maps to exactly one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub participant_low: Uuid,
    pub participant_high: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(a: Uuid, b: Uuid) -> Self {
        let (participant_low, participant_high) = canonical_pair(a, b);
        Self {
            id: Uuid::new_v4(),
            participant_low,
            participant_high,
            created_at: Utc::now(),
        }
    }

    pub fn includes(&self, user_id: Uuid) -> bool {
        self.participant_low == user_id || self.participant_high == user_id
    }
}

/// Order a pair of user ids.
///
/// `Uuid`'s `Ord` compares the raw bytes, which matches both the ordering of
/// the lowercase hyphenated form and PostgreSQL's `uuid` comparison used by
/// the `conversations_participants_ordered` check.
pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
