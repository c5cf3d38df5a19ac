//! Router for the schedule API

use axum::{Json, Router, extract::State, routing::post};
use http::HeaderMap;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::SharedState;
use crate::api::utils::graph_client;
use crate::scheduler::{
    self, BookingRequest, DEFAULT_DURATION_MINUTES, create_meeting, find_first_available,
};

async fn find_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(req): Json<public::FindTimeRequest>,
) -> Result<Json<public::FindTimeResponse>, ApiError> {
    let client = graph_client(&state.config, &headers)?;
    let configured = req
        .tenant_domain
        .as_deref()
        .or(state.config.tenant_domain.as_deref());
    let tenant_domain = client.tenant_domain(configured).await;

    let request = scheduler::FindTimeRequest {
        attendees: req.attendees,
        duration_minutes: req.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
        window_start: req.window_start,
        window_end: req.window_end,
        tenant_domain: tenant_domain.clone(),
        work_hours_only: req.work_hours_only,
    };
    let suggestion = find_first_available(&client, &request).await?;

    Ok(Json(public::FindTimeResponse {
        suggestion,
        tenant_domain,
    }))
}

async fn book_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(req): Json<public::BookRequest>,
) -> Result<Json<public::BookResponse>, ApiError> {
    let client = graph_client(&state.config, &headers)?;
    let booking = BookingRequest {
        subject: req.subject,
        body_html: req.body_html,
        attendees: req.attendees,
        start: req.start,
        end: req.end,
        online: req.online.unwrap_or(true),
        location: req.location,
        recurrence: req.recurrence,
    };
    let event = create_meeting(&client, &booking).await?;

    Ok(Json(public::BookResponse {
        id: event.id,
        subject: event.subject,
        start: event.start.date_time,
        end: event.end.date_time,
        join_url: event.online_meeting.and_then(|m| m.join_url),
        web_link: event.web_link,
    }))
}

/// Create the schedule router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/find", post(find_handler))
        .route("/book", post(book_handler))
}
