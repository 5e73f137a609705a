pub mod auth_service;
pub mod conversation_service;
pub mod profile_service;
pub mod room_service;

pub use auth_service::AuthService;
pub use conversation_service::ConversationService;
pub use profile_service::ProfileService;
pub use room_service::RoomService;
