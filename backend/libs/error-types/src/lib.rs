//! Shared API error body for the chat backend.
//!
//! Every HTTP error leaves the service as an [`ErrorResponse`] so clients can
//! route on `error_type` and localize on `code`.

use serde::{Deserialize, Serialize};

/// Unified API error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short reason phrase, e.g. "Not Found"
    pub error: String,

    /// Human readable message
    pub message: String,

    /// HTTP status code
    pub status: u16,

    /// Error class for client side routing, one of [`error_types`]
    pub error_type: String,

    /// Stable machine readable code, one of [`error_codes`]
    pub code: String,

    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str, status: u16, error_type: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            status,
            error_type: error_type.to_string(),
            code: code.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Standard error codes
pub mod error_codes {
    // Identity
    pub const USER_NOT_FOUND: &str = "USER_NOT_FOUND";
    pub const RECIPIENT_NOT_FOUND: &str = "RECIPIENT_NOT_FOUND";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";

    // Direct messaging
    pub const CONVERSATION_NOT_FOUND: &str = "CONVERSATION_NOT_FOUND";
    pub const MESSAGE_NOT_FOUND: &str = "MESSAGE_NOT_FOUND";

    // Rooms
    pub const ROOM_NOT_FOUND: &str = "ROOM_NOT_FOUND";
    pub const MEMBERSHIP_NOT_FOUND: &str = "MEMBERSHIP_NOT_FOUND";
    pub const ALREADY_MEMBER: &str = "ALREADY_MEMBER";
    pub const USER_BANNED: &str = "USER_BANNED";
    pub const INSUFFICIENT_ROLE: &str = "INSUFFICIENT_ROLE";
    pub const INVALID_ROLE_TRANSITION: &str = "INVALID_ROLE_TRANSITION";

    // Generic
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const RESOURCE_CONFLICT: &str = "RESOURCE_CONFLICT";

    // Database/System
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
}

/// Standard error types
pub mod error_types {
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const AUTHENTICATION_ERROR: &str = "authentication_error";
    pub const AUTHORIZATION_ERROR: &str = "authorization_error";
    pub const NOT_FOUND_ERROR: &str = "not_found_error";
    pub const CONFLICT_ERROR: &str = "conflict_error";
    pub const STATE_ERROR: &str = "state_error";
    pub const SERVER_ERROR: &str = "server_error";
}
