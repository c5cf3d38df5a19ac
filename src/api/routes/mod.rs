//! API routes module

pub mod directory;
pub mod schedule;
pub mod session;
pub mod workspace;

use axum::Router;

use crate::api::state::SharedState;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Meeting time search and booking
        .nest("/schedule", schedule::router())
        // Attribute queries over directory users
        .nest("/directory", directory::router())
        // Token hints and sign out
        .nest("/session", session::router())
        // Meetings, chats and teams
        .merge(workspace::router())
}
