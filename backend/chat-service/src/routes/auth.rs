//! Public registration and login endpoints

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 3, max = 32))]
    pub phone: String,
    #[validate(length(max = 64))]
    pub handle: Option<String>,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// POST /api/register
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = state
        .auth
        .register(&body.name, &body.phone, body.handle.as_deref(), &body.password)
        .await?;

    Ok(HttpResponse::Created().json(user))
}

/// POST /api/login
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let token = state.auth.login(&body.phone, &body.password).await?;
    Ok(HttpResponse::Ok().json(token))
}
