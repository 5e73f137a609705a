pub mod conversation;
pub mod member;
pub mod message;
pub mod room;
pub mod user;

// Re-export for convenience
pub use conversation::{canonical_pair, Conversation};
pub use member::{permits, RoomAction, RoomRole};
pub use message::Message;
pub use room::{Room, RoomMembership, RoomMessage, RoomType};
pub use user::User;
