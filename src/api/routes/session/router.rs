//! Router for the session API

use axum::{Json, Router, extract::State, routing::get};
use http::{HeaderMap, StatusCode};

use super::public;
use crate::api::state::SharedState;
use crate::api::utils::session_token;
use crate::core::token::TokenHints;

async fn session_get(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Json<public::SessionResponse> {
    let token = session_token(&state.config, &headers);
    let hints = token.and_then(TokenHints::decode);
    let expired = hints
        .as_ref()
        .is_some_and(|h| h.is_expired(chrono::Utc::now()));

    Json(public::SessionResponse {
        hints,
        expired,
        cached_chats: token.map_or(0, |t| state.chat_members.cached_for(t)),
    })
}

async fn session_delete(State(state): State<SharedState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = session_token(&state.config, &headers) {
        state.clear_session(token);
        tracing::debug!("Session cache cleared");
    }
    StatusCode::NO_CONTENT
}

/// Create the session router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(session_get).delete(session_delete))
}
