//! Registration, login and profile management

use chat_service::error::AppError;
use chat_service::models::RoomType;
use chat_service::repository::{InMemoryStore, Repositories, RoomMembershipRepository};
use chat_service::services::profile_service::ProfileUpdate;
use chat_service::services::{AuthService, ConversationService, ProfileService, RoomService};
use crypto_core::jwt;
use std::sync::Arc;

fn services(store: &Arc<InMemoryStore>) -> (AuthService, ProfileService) {
    let repos = Repositories::from_store(store.clone());
    (
        AuthService::new(repos.users.clone()),
        ProfileService::new(repos.users),
    )
}

#[tokio::test]
async fn test_register_and_login() {
    crypto_core::test_utils::init_test_keys();
    let store = Arc::new(InMemoryStore::new());
    let (auth, _) = services(&store);

    let user = auth
        .register("Alice", "555-0100", Some("alice"), "correct horse")
        .await
        .unwrap();
    assert_eq!(user.handle.as_deref(), Some("@alice"));
    assert_ne!(user.password_hash, "correct horse");

    let token = auth.login("555-0100", "correct horse").await.unwrap();
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(jwt::get_user_id_from_token(&token.access_token).unwrap(), user.id);

    let claims = jwt::validate_token(&token.access_token).unwrap().claims;
    assert_eq!(claims.handle.as_deref(), Some("@alice"));
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    crypto_core::test_utils::init_test_keys();
    let store = Arc::new(InMemoryStore::new());
    let (auth, _) = services(&store);
    auth.register("Alice", "555-0100", None, "correct horse")
        .await
        .unwrap();

    let wrong_password = auth.login("555-0100", "battery staple").await.unwrap_err();
    let unknown_phone = auth.login("555-0199", "correct horse").await.unwrap_err();

    assert!(matches!(wrong_password, AppError::Unauthenticated(_)));
    assert!(matches!(unknown_phone, AppError::Unauthenticated(_)));
    assert_eq!(wrong_password.to_string(), unknown_phone.to_string());
}

#[tokio::test]
async fn test_register_validation_and_conflicts() {
    let store = Arc::new(InMemoryStore::new());
    let (auth, _) = services(&store);

    let err = auth.register("Alice", "555-0100", None, "short").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = auth.register(" ", "555-0100", None, "long enough").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    auth.register("Alice", "555-0100", Some("@alice"), "long enough")
        .await
        .unwrap();

    let err = auth
        .register("Alice Two", "555-0100", None, "long enough")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = auth
        .register("Impostor", "555-0101", Some("alice"), "long enough")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_update_profile() {
    crypto_core::test_utils::init_test_keys();
    let store = Arc::new(InMemoryStore::new());
    let (auth, profiles) = services(&store);
    let alice = auth
        .register("Alice", "555-0100", Some("@alice"), "correct horse")
        .await
        .unwrap();
    auth.register("Bob", "555-0101", Some("@bob"), "correct horse")
        .await
        .unwrap();

    let err = profiles
        .update_profile(
            alice.id,
            ProfileUpdate {
                handle: Some("bob".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = profiles
        .update_profile(
            alice.id,
            ProfileUpdate {
                password: Some("short".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let updated = profiles
        .update_profile(
            alice.id,
            ProfileUpdate {
                name: Some("Alice Liddell".into()),
                handle: Some("  ".into()),
                password: Some("battery staple".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Alice Liddell");
    assert_eq!(updated.handle.as_deref(), Some("@alice"));

    assert!(auth.login("555-0100", "battery staple").await.is_ok());
    assert!(auth.login("555-0100", "correct horse").await.is_err());

    // Keeping your own handle is not a conflict
    profiles
        .update_profile(
            alice.id,
            ProfileUpdate {
                handle: Some("@alice".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(profiles.get_profile(alice.id).await.unwrap().name, "Alice Liddell");
}

#[tokio::test]
async fn test_delete_profile_cascades() {
    let store = Arc::new(InMemoryStore::new());
    let repos = Repositories::from_store(store.clone());
    let auth = AuthService::new(repos.users.clone());
    let profiles = ProfileService::new(repos.users.clone());
    let conversations = ConversationService::from_repositories(&repos);
    let rooms = RoomService::from_repositories(&repos);

    let alice = auth
        .register("Alice", "555-0100", None, "correct horse")
        .await
        .unwrap();
    let bob = auth
        .register("Bob", "555-0101", None, "correct horse")
        .await
        .unwrap();
    conversations
        .send_message(alice.id, "555-0101", "hi")
        .await
        .unwrap();
    let room = rooms
        .create_room(bob.id, "Club", None, RoomType::Group)
        .await
        .unwrap();
    rooms.add_member(room.id, bob.id, alice.id).await.unwrap();

    profiles.delete_profile(alice.id).await.unwrap();

    assert!(matches!(
        profiles.get_profile(alice.id).await,
        Err(AppError::UserNotFound)
    ));
    assert!(conversations.get_conversations(bob.id).await.unwrap().is_empty());
    assert_eq!(store.get_member_role(room.id, alice.id).await.unwrap(), None);

    let err = profiles.delete_profile(alice.id).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));
}
