//! Router for meetings, chats and teams

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_extra::extract::Query;
use http::HeaderMap;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::SharedState;
use crate::api::utils::graph_client;
use crate::graph::models::{Channel, Chat, ConversationMember, Team};

const DEFAULT_DAYS_AHEAD: i64 = 7;

async fn meetings_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<public::MeetingsQuery>,
) -> Result<Json<public::ListResponse<public::MeetingResponse>>, ApiError> {
    let client = graph_client(&state.config, &headers)?;

    // Default to 7 days ahead if not specified
    let days_ahead = params.days_ahead.unwrap_or(DEFAULT_DAYS_AHEAD).max(1);
    let now = chrono::Utc::now();
    let events = client
        .calendar_view(now, now + chrono::Duration::days(days_ahead))
        .await?;

    let items = events
        .items
        .into_iter()
        .map(|event| public::MeetingResponse {
            id: event.id,
            subject: event.subject.unwrap_or_else(|| "No title".to_string()),
            start: event.start.date_time,
            end: event.end.date_time,
            is_online: event.is_online_meeting,
            join_url: event.online_meeting.and_then(|m| m.join_url),
            organizer: event.organizer.map(|o| o.email_address.address),
            attendees: event
                .attendees
                .into_iter()
                .map(|a| public::MeetingAttendee {
                    email: a.email_address.address,
                    display_name: a.email_address.name,
                    kind: a.kind,
                })
                .collect(),
        })
        .collect();

    Ok(Json(public::ListResponse {
        items,
        truncated: events.truncated,
    }))
}

async fn chats_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<public::ListResponse<Chat>>, ApiError> {
    let client = graph_client(&state.config, &headers)?;
    let chats = client.chats().await?;
    Ok(Json(public::ListResponse {
        items: chats.items,
        truncated: chats.truncated,
    }))
}

async fn chat_members_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
) -> Result<Json<Vec<ConversationMember>>, ApiError> {
    let client = graph_client(&state.config, &headers)?;
    let members = client.chat_members(&state.chat_members, &chat_id).await?;
    Ok(Json(members))
}

async fn teams_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<public::ListResponse<Team>>, ApiError> {
    let client = graph_client(&state.config, &headers)?;
    let teams = client.joined_teams().await?;
    Ok(Json(public::ListResponse {
        items: teams.items,
        truncated: teams.truncated,
    }))
}

async fn channels_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(team_id): Path<String>,
) -> Result<Json<public::ListResponse<Channel>>, ApiError> {
    let client = graph_client(&state.config, &headers)?;
    let channels = client.channels(&team_id).await?;
    Ok(Json(public::ListResponse {
        items: channels.items,
        truncated: channels.truncated,
    }))
}

async fn channel_members_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path((team_id, channel_id)): Path<(String, String)>,
) -> Result<Json<public::ListResponse<ConversationMember>>, ApiError> {
    let client = graph_client(&state.config, &headers)?;
    let members = client.channel_members(&team_id, &channel_id).await?;
    Ok(Json(public::ListResponse {
        items: members.items,
        truncated: members.truncated,
    }))
}

/// Create the workspace router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/meetings", get(meetings_handler))
        .route("/chats", get(chats_handler))
        .route("/chats/{id}/members", get(chat_members_handler))
        .route("/teams", get(teams_handler))
        .route("/teams/{id}/channels", get(channels_handler))
        .route(
            "/teams/{id}/channels/{channel_id}/members",
            get(channel_members_handler),
        )
}
