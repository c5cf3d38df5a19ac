//! Finding a common meeting time and booking it.
//!
//! Availability comes from Graph `findMeetingTimes`. When the strict
//! query (everyone required) comes back empty the search is repeated
//! with external attendees made optional, then with internal attendees
//! only. A slot is only ever returned if Graph suggested it.

mod booking;
pub mod recurrence;

pub use booking::{BookingRequest, create_meeting};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::models::{DateTimeTimeZone, EmailAddress};
use crate::graph::{GraphClient, GraphError};

pub const MIN_DURATION_MINUTES: i64 = 15;
pub const MAX_DURATION_MINUTES: i64 = 240;
pub const DEFAULT_DURATION_MINUTES: i64 = 30;
pub const DEFAULT_WINDOW_DAYS: i64 = 7;
const MAX_CANDIDATES: u32 = 10;

pub fn clamp_duration(minutes: i64) -> i64 {
    minutes.clamp(MIN_DURATION_MINUTES, MAX_DURATION_MINUTES)
}

/// ISO-8601 duration for a clamped meeting length, e.g. `PT30M`
pub fn iso_duration(minutes: i64) -> String {
    format!("PT{}M", clamp_duration(minutes))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendeeSplit {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

impl AttendeeSplit {
    pub fn all(&self) -> Vec<String> {
        self.internal
            .iter()
            .chain(self.external.iter())
            .cloned()
            .collect()
    }
}

/// Split addresses on whether their domain is the tenant's. Without a
/// tenant domain everyone is external.
pub fn split_attendees(emails: &[String], tenant_domain: Option<&str>) -> AttendeeSplit {
    let mut split = AttendeeSplit::default();
    for addr in emails.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
        let domain = addr.split('@').nth(1).unwrap_or("");
        match tenant_domain {
            Some(tenant) if !tenant.is_empty() && domain.eq_ignore_ascii_case(tenant.trim()) => {
                split.internal.push(addr.to_string())
            }
            _ => split.external.push(addr.to_string()),
        }
    }
    split
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeBase {
    pub email_address: EmailAddress,
    #[serde(rename = "type")]
    pub kind: AttendeeType,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttendeeType {
    Required,
    Optional,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeSlot {
    pub start: DateTimeTimeZone,
    pub end: DateTimeTimeZone,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeConstraint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_domain: Option<String>,
    pub time_slots: Vec<TimeSlot>,
}

/// Body of `POST /me/findMeetingTimes`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FindMeetingTimesRequest {
    pub attendees: Vec<AttendeeBase>,
    pub time_constraint: TimeConstraint,
    pub meeting_duration: String,
    pub max_candidates: u32,
    pub is_organizer_optional: bool,
    pub return_suggestion_reasons: bool,
    /// Fraction of attendees that must be free, 0.0 to 1.0
    pub minimum_attendee_percentage: f64,
}

impl FindMeetingTimesRequest {
    pub fn required_count(&self) -> usize {
        self.attendees
            .iter()
            .filter(|a| a.kind == AttendeeType::Required)
            .count()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTimeSlot {
    pub start: DateTimeTimeZone,
    pub end: DateTimeTimeZone,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeetingTimeSuggestion {
    pub confidence: Option<f64>,
    pub meeting_time_slot: MeetingTimeSlot,
    pub suggestion_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeetingTimeSuggestionsResult {
    #[serde(default)]
    meeting_time_suggestions: Vec<MeetingTimeSuggestion>,
    empty_suggestions_reason: Option<String>,
}

/// Source of availability suggestions
#[async_trait]
pub trait MeetingTimeFinder: Send + Sync {
    async fn find_meeting_times(
        &self,
        request: &FindMeetingTimesRequest,
    ) -> Result<Vec<MeetingTimeSuggestion>, GraphError>;
}

#[async_trait]
impl MeetingTimeFinder for GraphClient {
    async fn find_meeting_times(
        &self,
        request: &FindMeetingTimesRequest,
    ) -> Result<Vec<MeetingTimeSuggestion>, GraphError> {
        let result: MeetingTimeSuggestionsResult =
            self.post_json("/me/findMeetingTimes", request).await?;
        if result.meeting_time_suggestions.is_empty()
            && let Some(reason) = result.empty_suggestions_reason
        {
            tracing::debug!("No meeting time suggestions: {}", reason);
        }
        Ok(result.meeting_time_suggestions)
    }
}

/// Which query produced a suggestion, from strictest to most relaxed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Attempt {
    AllRequired,
    ExternalOptional,
    InternalOnly,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindTimeRequest {
    pub attendees: Vec<String>,
    #[serde(default = "default_duration")]
    pub duration_minutes: i64,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    pub tenant_domain: Option<String>,
    #[serde(default)]
    pub work_hours_only: bool,
}

fn default_duration() -> i64 {
    DEFAULT_DURATION_MINUTES
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MeetingSuggestion {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub confidence: f64,
    pub attempt: Attempt,
}

/// Half-open window `[start, end)`, defaulting to the next seven days
pub fn resolve_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), GraphError> {
    let start = start.unwrap_or(now);
    let end = end.unwrap_or_else(|| now + Duration::days(DEFAULT_WINDOW_DAYS));
    if end <= start {
        return Err(GraphError::InvalidInput(format!(
            "window end {} is not after start {}",
            end, start
        )));
    }
    Ok((start, end))
}

fn attendee_list(required: &[String], optional: &[String]) -> Vec<AttendeeBase> {
    let entry = |address: &String, kind| AttendeeBase {
        email_address: EmailAddress {
            address: address.clone(),
            name: None,
        },
        kind,
    };
    required
        .iter()
        .map(|a| entry(a, AttendeeType::Required))
        .chain(optional.iter().map(|a| entry(a, AttendeeType::Optional)))
        .collect()
}

/// Threshold for the relaxed attempt: the internal share of attendees,
/// never below one half
pub fn relaxed_threshold(internal: usize, external: usize) -> f64 {
    let total = internal + external;
    if total == 0 {
        return 1.0;
    }
    (internal as f64 / total as f64).clamp(0.5, 1.0)
}

/// Pick the suggestion that starts first. Suggestions whose times can't
/// be read are ignored.
pub fn earliest_suggestion(
    suggestions: &[MeetingTimeSuggestion],
    attempt: Attempt,
) -> Option<MeetingSuggestion> {
    suggestions
        .iter()
        .filter_map(|s| {
            let start = s.meeting_time_slot.start.to_utc()?;
            let end = s.meeting_time_slot.end.to_utc()?;
            Some(MeetingSuggestion {
                start,
                end,
                confidence: s.confidence.unwrap_or(0.0),
                attempt,
            })
        })
        .min_by_key(|s| s.start)
}

/// Find the earliest slot where the attendees can meet, relaxing
/// requirements when the strict query finds nothing. Returns `Ok(None)`
/// when no attempt produced a slot; failed attempts count as empty.
pub async fn find_first_available<F>(
    finder: &F,
    request: &FindTimeRequest,
) -> Result<Option<MeetingSuggestion>, GraphError>
where
    F: MeetingTimeFinder + ?Sized,
{
    let attendees: Vec<String> = request
        .attendees
        .iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();
    if attendees.is_empty() {
        return Err(GraphError::InvalidInput(String::from(
            "at least one attendee is required",
        )));
    }

    let (start, end) = resolve_window(request.window_start, request.window_end, Utc::now())?;
    let time_constraint = TimeConstraint {
        activity_domain: request.work_hours_only.then(|| String::from("work")),
        time_slots: vec![TimeSlot {
            start: DateTimeTimeZone::utc(start),
            end: DateTimeTimeZone::utc(end),
        }],
    };
    let meeting_duration = iso_duration(request.duration_minutes);
    let split = split_attendees(&attendees, request.tenant_domain.as_deref());

    let query = |required: &[String], optional: &[String], threshold: f64| {
        FindMeetingTimesRequest {
            attendees: attendee_list(required, optional),
            time_constraint: time_constraint.clone(),
            meeting_duration: meeting_duration.clone(),
            max_candidates: MAX_CANDIDATES,
            is_organizer_optional: false,
            return_suggestion_reasons: true,
            minimum_attendee_percentage: threshold,
        }
    };

    let mut attempts = vec![(Attempt::AllRequired, query(&attendees, &[], 1.0))];
    if !split.internal.is_empty() && !split.external.is_empty() {
        attempts.push((
            Attempt::ExternalOptional,
            query(
                &split.internal,
                &split.external,
                relaxed_threshold(split.internal.len(), split.external.len()),
            ),
        ));
    }
    if !split.internal.is_empty() {
        attempts.push((Attempt::InternalOnly, query(&split.internal, &[], 1.0)));
    }

    for (attempt, body) in attempts {
        let suggestions = match finder.find_meeting_times(&body).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::warn!("findMeetingTimes {:?} attempt failed: {}", attempt, e);
                continue;
            }
        };
        if let Some(found) = earliest_suggestion(&suggestions, attempt) {
            tracing::debug!("Found slot at {} on {:?} attempt", found.start, attempt);
            return Ok(Some(found));
        }
    }

    Ok(None)
}
