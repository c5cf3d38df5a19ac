//! Chats and chat membership

use super::models::{Chat, ConversationMember};
use super::{GraphClient, GraphError, MAX_PAGES, Paged};
use crate::core::cache::SessionCache;
use crate::core::token::bearer_token;

/// Chat members of one session, keyed by chat id
pub type ChatMembers = SessionCache<String, Vec<ConversationMember>>;

/// Chat members cached per bearer token. Membership fetched with one
/// token is never served to a request carrying another.
#[derive(Debug, Clone, Default)]
pub struct ChatMembersCache {
    sessions: SessionCache<String, ChatMembers>,
}

impl ChatMembersCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache for the session identified by `token`
    pub fn session(&self, token: &str) -> ChatMembers {
        self.sessions.get_or_default(bearer_token(token).to_string())
    }

    /// Number of chats cached for `token`
    pub fn cached_for(&self, token: &str) -> usize {
        self.sessions
            .get(&bearer_token(token).to_string())
            .map_or(0, |members| members.len())
    }

    /// Forget everything cached for `token`, used on sign out
    pub fn end_session(&self, token: &str) {
        self.sessions.invalidate(&bearer_token(token).to_string());
    }

    /// Drop every session
    pub fn clear(&self) {
        self.sessions.clear();
    }

    /// Number of chats cached across all sessions
    pub fn len(&self) -> usize {
        let mut total = 0;
        self.sessions.for_each(|_, members| total += members.len());
        total
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GraphClient {
    pub async fn chats(&self) -> Result<Paged<Chat>, GraphError> {
        self.get_all_pages("/me/chats", &[("$top", "50".to_string())], &[], MAX_PAGES)
            .await
    }

    /// Members of a chat. Cached for the session of this client's
    /// token; failures are not cached.
    pub async fn chat_members(
        &self,
        cache: &ChatMembersCache,
        chat_id: &str,
    ) -> Result<Vec<ConversationMember>, GraphError> {
        let cache = cache.session(self.token());
        if let Some(members) = cache.get(&chat_id.to_string()) {
            tracing::debug!("Chat members cache hit for {}", chat_id);
            return Ok(members);
        }

        let path = format!("/chats/{}/members", urlencoding::encode(chat_id));
        let members = self
            .get_all_pages::<ConversationMember>(&path, &[], &[], MAX_PAGES)
            .await?
            .items;
        cache.set(chat_id.to_string(), members.clone());
        Ok(members)
    }
}
