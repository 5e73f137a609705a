use crate::{
    config::Config,
    repository::Repositories,
    services::{AuthService, ConversationService, ProfileService, RoomService},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub conversations: Arc<ConversationService>,
    pub rooms: Arc<RoomService>,
    pub auth: Arc<AuthService>,
    pub profiles: Arc<ProfileService>,
}

impl AppState {
    pub fn new(config: Arc<Config>, repos: Repositories) -> Self {
        Self {
            config,
            conversations: Arc::new(ConversationService::from_repositories(&repos)),
            rooms: Arc::new(RoomService::from_repositories(&repos)),
            auth: Arc::new(AuthService::new(repos.users.clone())),
            profiles: Arc::new(ProfileService::new(repos.users.clone())),
        }
    }
}
