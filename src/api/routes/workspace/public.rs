//! Public types for the meetings, chats and teams API
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct MeetingsQuery {
    pub days_ahead: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct MeetingAttendee {
    pub email: String,
    pub display_name: Option<String>,
    pub kind: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct MeetingResponse {
    pub id: String,
    pub subject: String,
    pub start: String,
    pub end: String,
    pub is_online: bool,
    pub join_url: Option<String>,
    pub organizer: Option<String>,
    pub attendees: Vec<MeetingAttendee>,
}

#[derive(Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub truncated: bool,
}
