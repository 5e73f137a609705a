use crate::middleware::error_handling;
use crate::repository::StoreError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(AppError::status_code(self)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        error_handling::into_response(self)
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server start failure: {0}")]
    StartServer(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid token, or bad credentials
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Role or ownership check failed
    #[error("not allowed to perform this action")]
    Unauthorized,

    #[error("recipient not found")]
    RecipientNotFound,

    #[error("conversation not found")]
    ConversationNotFound,

    #[error("message not found")]
    MessageNotFound,

    #[error("room not found")]
    RoomNotFound,

    #[error("membership not found")]
    MembershipNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("user is already a member of this room")]
    AlreadyMember,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("user is banned from this room")]
    Banned,

    #[error("invalid role transition: {0}")]
    InvalidRoleTransition(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("internal server error")]
    Internal,
}

impl AppError {
    /// Returns whether this error is retryable (e.g., database connection timeout)
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Store(StoreError::Database(e)) => {
                matches!(
                    e,
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
                )
            }
            AppError::Internal => true,
            _ => false,
        }
    }

    /// Returns HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::BadRequest(_) => 400,
            AppError::Unauthenticated(_) => 401,
            AppError::Unauthorized | AppError::Banned => 403,
            AppError::RecipientNotFound
            | AppError::ConversationNotFound
            | AppError::MessageNotFound
            | AppError::RoomNotFound
            | AppError::MembershipNotFound
            | AppError::UserNotFound => 404,
            AppError::AlreadyMember | AppError::Conflict(_) => 409,
            AppError::InvalidRoleTransition(_) => 422,
            AppError::Store(StoreError::UniqueViolation(_)) => 409,
            AppError::Store(_)
            | AppError::Config(_)
            | AppError::StartServer(_)
            | AppError::Internal => 500,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::BadRequest(e.to_string())
    }
}
