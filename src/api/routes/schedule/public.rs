//! Public types for the schedule API
use serde::{Deserialize, Serialize};

use crate::scheduler::MeetingSuggestion;
use crate::scheduler::recurrence::RecurrenceOptions;

#[derive(Deserialize)]
pub struct FindTimeRequest {
    pub attendees: Vec<String>,
    pub duration_minutes: Option<i64>,
    pub window_start: Option<chrono::DateTime<chrono::Utc>>,
    pub window_end: Option<chrono::DateTime<chrono::Utc>>,
    pub tenant_domain: Option<String>,
    #[serde(default)]
    pub work_hours_only: bool,
}

#[derive(Serialize)]
pub struct FindTimeResponse {
    /// `null` when no attempt produced a slot
    pub suggestion: Option<MeetingSuggestion>,
    pub tenant_domain: Option<String>,
}

#[derive(Deserialize)]
pub struct BookRequest {
    pub subject: Option<String>,
    pub body_html: Option<String>,
    pub attendees: Vec<String>,
    pub start: chrono::DateTime<chrono::Utc>,
    pub end: chrono::DateTime<chrono::Utc>,
    pub online: Option<bool>,
    pub location: Option<String>,
    pub recurrence: Option<RecurrenceOptions>,
}

#[derive(Serialize)]
pub struct BookResponse {
    pub id: String,
    pub subject: Option<String>,
    pub start: String,
    pub end: String,
    pub join_url: Option<String>,
    pub web_link: Option<String>,
}
