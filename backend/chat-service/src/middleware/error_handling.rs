use crate::error::AppError;
use actix_web::{http::StatusCode, HttpResponse};
use error_types::{error_codes, error_types as kinds, ErrorResponse};

/// Map domain errors to HTTP status and the shared error body
pub fn map_error(err: &AppError) -> (StatusCode, ErrorResponse) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let (error_type, code) = match err {
        AppError::BadRequest(_) => (kinds::VALIDATION_ERROR, error_codes::VALIDATION_FAILED),
        AppError::Unauthenticated(_) => {
            (kinds::AUTHENTICATION_ERROR, error_codes::INVALID_CREDENTIALS)
        }
        AppError::Unauthorized => (kinds::AUTHORIZATION_ERROR, error_codes::INSUFFICIENT_ROLE),
        AppError::RecipientNotFound => (kinds::NOT_FOUND_ERROR, error_codes::RECIPIENT_NOT_FOUND),
        AppError::ConversationNotFound => {
            (kinds::NOT_FOUND_ERROR, error_codes::CONVERSATION_NOT_FOUND)
        }
        AppError::MessageNotFound => (kinds::NOT_FOUND_ERROR, error_codes::MESSAGE_NOT_FOUND),
        AppError::RoomNotFound => (kinds::NOT_FOUND_ERROR, error_codes::ROOM_NOT_FOUND),
        AppError::MembershipNotFound => {
            (kinds::NOT_FOUND_ERROR, error_codes::MEMBERSHIP_NOT_FOUND)
        }
        AppError::UserNotFound => (kinds::NOT_FOUND_ERROR, error_codes::USER_NOT_FOUND),
        AppError::AlreadyMember => (kinds::CONFLICT_ERROR, error_codes::ALREADY_MEMBER),
        AppError::Conflict(_) => (kinds::CONFLICT_ERROR, error_codes::RESOURCE_CONFLICT),
        AppError::Banned => (kinds::STATE_ERROR, error_codes::USER_BANNED),
        AppError::InvalidRoleTransition(_) => {
            (kinds::STATE_ERROR, error_codes::INVALID_ROLE_TRANSITION)
        }
        AppError::Store(e) if e.is_unique_violation() => {
            (kinds::CONFLICT_ERROR, error_codes::RESOURCE_CONFLICT)
        }
        AppError::Store(_) => (kinds::SERVER_ERROR, error_codes::DATABASE_ERROR),
        AppError::Config(_) | AppError::StartServer(_) | AppError::Internal => {
            (kinds::SERVER_ERROR, error_codes::INTERNAL_SERVER_ERROR)
        }
    };

    // Store and startup details stay in the logs
    let message = if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
        "internal server error".to_string()
    } else {
        err.to_string()
    };

    let response = ErrorResponse::new(
        status.canonical_reason().unwrap_or("Error"),
        &message,
        status.as_u16(),
        error_type,
        code,
    );

    (status, response)
}

pub fn into_response(err: &AppError) -> HttpResponse {
    let (status, response) = map_error(err);
    HttpResponse::build(status).json(response)
}
