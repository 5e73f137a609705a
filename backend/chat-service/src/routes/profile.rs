use actix_web::{delete, get, put, web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::AppError, middleware::guards::User, services::profile_service::ProfileUpdate,
    state::AppState,
};

/// Blank or missing fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 64))]
    pub handle: Option<String>,
    #[validate(length(max = 128))]
    pub password: Option<String>,
}

#[get("/profile")]
pub async fn get_profile(
    state: web::Data<AppState>,
    user: User,
) -> Result<HttpResponse, AppError> {
    let profile = state.profiles.get_profile(user.id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    user: User,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;
    let body = body.into_inner();

    let profile = state
        .profiles
        .update_profile(
            user.id,
            ProfileUpdate {
                name: body.name,
                handle: body.handle,
                password: body.password,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[delete("/profile")]
pub async fn delete_profile(
    state: web::Data<AppState>,
    user: User,
) -> Result<HttpResponse, AppError> {
    state.profiles.delete_profile(user.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
