pub mod auth;
pub mod conversations;
pub mod health;
pub mod messages;
pub mod profile;
pub mod rooms;

use actix_web::web;

use crate::error::AppError;
use crate::middleware::JwtAuthMiddleware;

/// Register every route. Everything under `/api` except register and login
/// requires a bearer token.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(
            web::scope("/api")
                .wrap(JwtAuthMiddleware)
                .service(auth::register)
                .service(auth::login)
                .service(profile::get_profile)
                .service(profile::update_profile)
                .service(profile::delete_profile)
                .service(conversations::send_message)
                .service(conversations::get_conversations)
                .service(conversations::get_messages)
                .service(messages::update_message)
                .service(messages::delete_message)
                // Before /rooms/{id} so "handle" is not parsed as an id
                .service(rooms::get_room_by_handle)
                .service(rooms::create_room)
                .service(rooms::get_room)
                .service(rooms::update_room)
                .service(rooms::delete_room)
                .service(rooms::list_members)
                .service(rooms::add_member)
                .service(rooms::remove_member)
                .service(rooms::promote_member)
                .service(rooms::ban_member)
                .service(rooms::unban_member)
                .service(rooms::get_messages)
                .service(rooms::send_message)
                .service(rooms::delete_message),
        );
}

/// Malformed JSON bodies surface as 400 with the shared error body
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}
