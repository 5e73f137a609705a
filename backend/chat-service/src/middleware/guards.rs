//! Request guards for handlers

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use super::auth::UserId;
use crate::error::AppError;

/// Represents an authenticated user extracted from JWT claims
#[derive(Debug, Clone, Copy)]
pub struct User {
    pub id: Uuid,
}

impl FromRequest for User {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req.extensions().get::<UserId>().map(|u| u.0);
        ready(user_id.map(|id| User { id }).ok_or_else(|| {
            AppError::Unauthenticated("user not authenticated".into())
        }))
    }
}
