//! Room endpoints: lifecycle, membership moderation and room messages

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, middleware::guards::User, models::RoomType, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 64))]
    pub handle: Option<String>,
    #[serde(rename = "type", alias = "room_type", default = "default_room_type")]
    pub room_type: RoomType,
}

fn default_room_type() -> RoomType {
    RoomType::Group
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 64))]
    pub handle: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendRoomMessageRequest {
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct MemberPath {
    pub id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MessagePath {
    pub id: Uuid,
    pub message_id: Uuid,
}

/// POST /api/rooms
#[post("/rooms")]
pub async fn create_room(
    state: web::Data<AppState>,
    user: User,
    body: web::Json<CreateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let room = state
        .rooms
        .create_room(user.id, &body.name, body.handle.as_deref(), body.room_type)
        .await?;
    Ok(HttpResponse::Created().json(room))
}

/// GET /api/rooms/handle/{handle}
#[get("/rooms/handle/{handle}")]
pub async fn get_room_by_handle(
    state: web::Data<AppState>,
    _user: User,
    handle: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let room = state.rooms.find_room_by_handle(&handle).await?;
    Ok(HttpResponse::Ok().json(room))
}

/// GET /api/rooms/{id}
#[get("/rooms/{id}")]
pub async fn get_room(
    state: web::Data<AppState>,
    _user: User,
    room_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let room = state.rooms.get_room(room_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(room))
}

/// PUT /api/rooms/{id}
#[put("/rooms/{id}")]
pub async fn update_room(
    state: web::Data<AppState>,
    user: User,
    room_id: web::Path<Uuid>,
    body: web::Json<UpdateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let room = state
        .rooms
        .update_room(room_id.into_inner(), user.id, &body.name, body.handle.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(room))
}

/// DELETE /api/rooms/{id}
#[delete("/rooms/{id}")]
pub async fn delete_room(
    state: web::Data<AppState>,
    user: User,
    room_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.rooms.delete_room(room_id.into_inner(), user.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/rooms/{id}/members
#[get("/rooms/{id}/members")]
pub async fn list_members(
    state: web::Data<AppState>,
    _user: User,
    room_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let members = state.rooms.get_members(room_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(members))
}

/// POST /api/rooms/{id}/members
#[post("/rooms/{id}/members")]
pub async fn add_member(
    state: web::Data<AppState>,
    user: User,
    room_id: web::Path<Uuid>,
    body: web::Json<AddMemberRequest>,
) -> Result<HttpResponse, AppError> {
    let membership = state
        .rooms
        .add_member(room_id.into_inner(), user.id, body.user_id)
        .await?;
    Ok(HttpResponse::Created().json(membership))
}

/// DELETE /api/rooms/{id}/members/{user_id}
///
/// Removing yourself leaves the room.
#[delete("/rooms/{id}/members/{user_id}")]
pub async fn remove_member(
    state: web::Data<AppState>,
    user: User,
    path: web::Path<MemberPath>,
) -> Result<HttpResponse, AppError> {
    state
        .rooms
        .remove_member(path.id, user.id, path.user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/rooms/{id}/members/{user_id}/promote")]
pub async fn promote_member(
    state: web::Data<AppState>,
    user: User,
    path: web::Path<MemberPath>,
) -> Result<HttpResponse, AppError> {
    state
        .rooms
        .promote_member(path.id, user.id, path.user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/rooms/{id}/members/{user_id}/ban")]
pub async fn ban_member(
    state: web::Data<AppState>,
    user: User,
    path: web::Path<MemberPath>,
) -> Result<HttpResponse, AppError> {
    state.rooms.ban_member(path.id, user.id, path.user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/rooms/{id}/members/{user_id}/unban")]
pub async fn unban_member(
    state: web::Data<AppState>,
    user: User,
    path: web::Path<MemberPath>,
) -> Result<HttpResponse, AppError> {
    state
        .rooms
        .unban_member(path.id, user.id, path.user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/rooms/{id}/messages
#[get("/rooms/{id}/messages")]
pub async fn get_messages(
    state: web::Data<AppState>,
    _user: User,
    room_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let messages = state.rooms.get_messages(room_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// POST /api/rooms/{id}/messages
#[post("/rooms/{id}/messages")]
pub async fn send_message(
    state: web::Data<AppState>,
    user: User,
    room_id: web::Path<Uuid>,
    body: web::Json<SendRoomMessageRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let message = state
        .rooms
        .send_message(room_id.into_inner(), user.id, &body.content)
        .await?;
    Ok(HttpResponse::Created().json(message))
}

/// DELETE /api/rooms/{id}/messages/{message_id}
#[delete("/rooms/{id}/messages/{message_id}")]
pub async fn delete_message(
    state: web::Data<AppState>,
    user: User,
    path: web::Path<MessagePath>,
) -> Result<HttpResponse, AppError> {
    state
        .rooms
        .delete_message(path.id, user.id, path.message_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
