//! Direct conversation endpoints

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, middleware::guards::User, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// '@handle' or phone number
    #[validate(length(min = 1, max = 64))]
    pub recipient: String,
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
}

/// POST /api/conversations/send
#[post("/conversations/send")]
pub async fn send_message(
    state: web::Data<AppState>,
    user: User,
    body: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let message = state
        .conversations
        .send_message(user.id, &body.recipient, &body.content)
        .await?;
    Ok(HttpResponse::Created().json(message))
}

/// GET /api/conversations
#[get("/conversations")]
pub async fn get_conversations(
    state: web::Data<AppState>,
    user: User,
) -> Result<HttpResponse, AppError> {
    let conversations = state.conversations.get_conversations(user.id).await?;
    Ok(HttpResponse::Ok().json(conversations))
}

/// GET /api/conversations/{id}/messages
#[get("/conversations/{id}/messages")]
pub async fn get_messages(
    state: web::Data<AppState>,
    _user: User,
    conversation_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let messages = state
        .conversations
        .get_messages(conversation_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(messages))
}
