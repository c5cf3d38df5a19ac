use std::sync::Arc;

use crate::core::AppConfig;
use crate::graph::chats::ChatMembersCache;

pub type SharedState = Arc<AppState>;

/// Process wide state. Cached Graph data is partitioned by bearer
/// token so callers never see each other's results.
pub struct AppState {
    pub config: AppConfig,
    pub chat_members: ChatMembersCache,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            chat_members: ChatMembersCache::new(),
        }
    }

    /// Drop everything cached for the session of `token`
    pub fn clear_session(&self, token: &str) {
        self.chat_members.end_session(token);
    }
}
