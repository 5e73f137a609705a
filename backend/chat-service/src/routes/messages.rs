use actix_web::{delete, put, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, middleware::guards::User, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMessageRequest {
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
}

/// PUT /api/messages/{id}
///
/// Only the sender may edit.
#[put("/messages/{id}")]
pub async fn update_message(
    state: web::Data<AppState>,
    user: User,
    message_id: web::Path<Uuid>,
    body: web::Json<UpdateMessageRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let message = state
        .conversations
        .update_message(user.id, message_id.into_inner(), &body.content)
        .await?;
    Ok(HttpResponse::Ok().json(message))
}

/// DELETE /api/messages/{id}
#[delete("/messages/{id}")]
pub async fn delete_message(
    state: web::Data<AppState>,
    user: User,
    message_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state
        .conversations
        .delete_message(user.id, message_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
