//! Public types for the session API
use serde::Serialize;

use crate::core::token::TokenHints;

#[derive(Serialize)]
pub struct SessionResponse {
    /// Decoded claims, `null` when no token was sent or it isn't a JWT
    pub hints: Option<TokenHints>,
    pub expired: bool,
    pub cached_chats: usize,
}
