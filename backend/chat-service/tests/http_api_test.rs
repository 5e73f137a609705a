//! End-to-end HTTP tests over the in-memory store

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test, web, App,
};
use actix_http::Request;
use chat_service::{config::Config, repository::Repositories, routes, state::AppState};
use crypto_core::test_utils::{init_test_keys, TEST_PRIVATE_KEY, TEST_PUBLIC_KEY};
use serde_json::{json, Value};
use std::sync::Arc;

fn test_state() -> AppState {
    init_test_keys();
    let config = Config::from_lookup(|key| match key {
        "STORE" => Some("memory".to_string()),
        "JWT_PRIVATE_KEY_PEM" => Some(TEST_PRIVATE_KEY.to_string()),
        "JWT_PUBLIC_KEY_PEM" => Some(TEST_PUBLIC_KEY.to_string()),
        _ => None,
    })
    .expect("test config");
    AppState::new(Arc::new(config), Repositories::in_memory())
}

/// Status of a request whether it was answered by a handler or rejected by
/// middleware
async fn status_of<S, B>(app: &S, req: Request) -> StatusCode
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.as_response_error().status_code(),
    }
}

/// Register a user and return (user id, bearer token)
async fn signup<S, B>(app: &S, name: &str, phone: &str, handle: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({
            "name": name,
            "phone": phone,
            "handle": handle,
            "password": "correct horse",
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: Value = test::read_body_json(resp).await;
    assert!(user.get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "phone": phone, "password": "correct horse" }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let token: Value = test::read_body_json(resp).await;

    (
        user["id"].as_str().unwrap().to_string(),
        token["access_token"].as_str().unwrap().to_string(),
    )
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_health_is_public() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_protected_routes_require_valid_token() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/conversations").to_request();
    assert_eq!(status_of(&app, req).await, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/profile")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    assert_eq!(status_of(&app, req).await, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/profile")
        .insert_header((header::AUTHORIZATION, "Token abc"))
        .to_request();
    assert_eq!(status_of(&app, req).await, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_register_rejects_bad_input() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({ "name": "Alice", "phone": "555-0100", "password": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let req = test::TestRequest::post()
        .uri("/api/register")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    signup(&app, "Alice", "555-0100", "@alice").await;
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({
            "name": "Alice Again",
            "phone": "555-0100",
            "password": "correct horse",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "phone": "555-0100", "password": "wrong password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_direct_messaging_flow() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let (_, alice) = signup(&app, "Alice", "555-0199", "@alice").await;
    let (_, bob) = signup(&app, "Bob", "555-0100", "@bob").await;

    let req = test::TestRequest::post()
        .uri("/api/conversations/send")
        .insert_header(bearer(&alice))
        .set_json(json!({ "recipient": "555-0100", "content": "hi bob" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/conversations/send")
        .insert_header(bearer(&bob))
        .set_json(json!({ "recipient": "@alice", "content": "hi alice" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let reply: Value = test::read_body_json(resp).await;
    assert_eq!(first["conversation_id"], reply["conversation_id"]);

    let req = test::TestRequest::get()
        .uri("/api/conversations")
        .insert_header(bearer(&bob))
        .to_request();
    let conversations: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(conversations.as_array().unwrap().len(), 1);

    let uri = format!(
        "/api/conversations/{}/messages",
        first["conversation_id"].as_str().unwrap()
    );
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&alice))
        .to_request();
    let messages: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(messages.as_array().unwrap().len(), 2);

    let message_uri = format!("/api/messages/{}", first["id"].as_str().unwrap());
    let req = test::TestRequest::put()
        .uri(&message_uri)
        .insert_header(bearer(&bob))
        .set_json(json!({ "content": "edited by bob" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&message_uri)
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::post()
        .uri("/api/conversations/send")
        .insert_header(bearer(&alice))
        .set_json(json!({ "recipient": "@nobody", "content": "hello?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "RECIPIENT_NOT_FOUND");
}

#[actix_web::test]
async fn test_channel_moderation_flow() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let (_, owner) = signup(&app, "Owner", "555-2000", "@owner").await;
    let (member_id, member) = signup(&app, "Member", "555-2001", "@member").await;

    let req = test::TestRequest::post()
        .uri("/api/rooms")
        .insert_header(bearer(&owner))
        .set_json(json!({ "name": "News", "handle": "news", "type": "channel" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let room: Value = test::read_body_json(resp).await;
    let room_id = room["id"].as_str().unwrap().to_string();
    assert_eq!(room["room_type"], "channel");
    assert_eq!(room["handle"], "@news");

    let req = test::TestRequest::get()
        .uri("/api/rooms/handle/news")
        .insert_header(bearer(&member))
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found["id"], room["id"]);

    let req = test::TestRequest::post()
        .uri(&format!("/api/rooms/{}/members", room_id))
        .insert_header(bearer(&owner))
        .set_json(json!({ "user_id": member_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let messages_uri = format!("/api/rooms/{}/messages", room_id);
    let req = test::TestRequest::post()
        .uri(&messages_uri)
        .insert_header(bearer(&member))
        .set_json(json!({ "content": "may I?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INSUFFICIENT_ROLE");

    let req = test::TestRequest::post()
        .uri(&format!("/api/rooms/{}/members/{}/ban", room_id, member_id))
        .insert_header(bearer(&owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::post()
        .uri(&messages_uri)
        .insert_header(bearer(&member))
        .set_json(json!({ "content": "now?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "USER_BANNED");

    let req = test::TestRequest::post()
        .uri(&messages_uri)
        .insert_header(bearer(&owner))
        .set_json(json!({ "content": "welcome" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/rooms/{}/members", room_id))
        .insert_header(bearer(&member))
        .to_request();
    let members: Value = test::call_and_read_body_json(&app, req).await;
    let roles: Vec<&str> = members
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert!(roles.contains(&"owner"));
    assert!(roles.contains(&"banned"));

    let req = test::TestRequest::get()
        .uri("/api/rooms/not-a-uuid")
        .insert_header(bearer(&owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/rooms/{}", room_id))
        .insert_header(bearer(&owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/rooms/{}", room_id))
        .insert_header(bearer(&owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
