use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::recurrence::{PatternedRecurrence, RecurrenceOptions};
use super::{MeetingSuggestion, clamp_duration};
use crate::graph::mail::ItemBody;
use crate::graph::models::{DateTimeTimeZone, EmailAddress, Event};
use crate::graph::{GraphClient, GraphError, error_message};

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub subject: Option<String>,
    pub body_html: Option<String>,
    pub attendees: Vec<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default = "default_online")]
    pub online: bool,
    pub location: Option<String>,
    pub recurrence: Option<RecurrenceOptions>,
}

fn default_online() -> bool {
    true
}

impl BookingRequest {
    /// Book exactly the slot that was suggested
    pub fn for_suggestion(suggestion: &MeetingSuggestion, attendees: Vec<String>) -> Self {
        Self {
            subject: None,
            body_html: None,
            attendees,
            start: suggestion.start,
            end: suggestion.end,
            online: true,
            location: None,
            recurrence: None,
        }
    }

    /// A request with an explicit duration, clamped like searches are
    pub fn starting_at(start: DateTime<Utc>, minutes: i64, attendees: Vec<String>) -> Self {
        Self {
            subject: None,
            body_html: None,
            attendees,
            start,
            end: start + chrono::Duration::minutes(clamp_duration(minutes)),
            online: true,
            location: None,
            recurrence: None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewEventAttendee {
    email_address: EmailAddress,
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct Location {
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewEvent {
    subject: String,
    body: ItemBody,
    start: DateTimeTimeZone,
    end: DateTimeTimeZone,
    attendees: Vec<NewEventAttendee>,
    is_online_meeting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    online_meeting_provider: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recurrence: Option<PatternedRecurrence>,
}

fn new_event(req: &BookingRequest) -> NewEvent {
    let subject = req
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Meeting");
    NewEvent {
        subject: subject.to_string(),
        body: ItemBody::new(req.body_html.as_deref().unwrap_or(""), true),
        start: DateTimeTimeZone::utc(req.start),
        end: DateTimeTimeZone::utc(req.end),
        attendees: req
            .attendees
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(|address| NewEventAttendee {
                email_address: EmailAddress {
                    address: address.to_string(),
                    name: None,
                },
                kind: "required",
            })
            .collect(),
        is_online_meeting: req.online,
        online_meeting_provider: req.online.then_some("teamsForBusiness"),
        location: req
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Location {
                display_name: l.to_string(),
            }),
        recurrence: req.recurrence.map(|r| r.pattern_from(req.start)),
    }
}

/// Create the event on the signed in user's calendar. Graph sends the
/// invitations. Only a non-2xx answer is `BookingFailed`, carrying the
/// Graph error message; a request that never got an answer stays
/// `GraphError::Request`.
pub async fn create_meeting(client: &GraphClient, req: &BookingRequest) -> Result<Event, GraphError> {
    if req.end <= req.start {
        return Err(GraphError::InvalidInput(String::from(
            "meeting must end after it starts",
        )));
    }
    if req.attendees.iter().all(|a| a.trim().is_empty()) {
        return Err(GraphError::InvalidInput(String::from(
            "at least one attendee is required",
        )));
    }

    let res = client
        .request(Method::POST, "/me/events")
        .json(&new_event(req))
        .send()
        .await?;
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        tracing::warn!("Booking rejected with {}", status);
        return Err(GraphError::BookingFailed {
            status: status.as_u16(),
            message: error_message(&text),
        });
    }

    let event: Event = serde_json::from_str(&text)?;
    tracing::info!("Booked event {} at {}", event.id, event.start.date_time);
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::recurrence::RecurrenceMode;
    use chrono::TimeZone;
    use mockito::Matcher;
    use serde_json::json;

    fn booking() -> BookingRequest {
        BookingRequest::starting_at(
            Utc.with_ymd_and_hms(2025, 3, 3, 13, 0, 0).unwrap(),
            30,
            vec!["ada@contoso.com".to_string(), " ".to_string()],
        )
    }

    #[test]
    fn test_new_event_defaults() {
        let body = serde_json::to_value(new_event(&booking())).unwrap();
        assert_eq!(body["subject"], "Meeting");
        assert_eq!(body["body"]["contentType"], "HTML");
        assert_eq!(body["start"]["dateTime"], "2025-03-03T13:00:00");
        assert_eq!(body["end"]["dateTime"], "2025-03-03T13:30:00");
        assert_eq!(body["isOnlineMeeting"], true);
        assert_eq!(body["onlineMeetingProvider"], "teamsForBusiness");
        assert_eq!(body["attendees"].as_array().unwrap().len(), 1);
        assert!(body.get("location").is_none());
        assert!(body.get("recurrence").is_none());
    }

    #[test]
    fn test_offline_event_with_location_and_recurrence() {
        let mut req = booking();
        req.online = false;
        req.location = Some("Room 4".to_string());
        req.recurrence = Some(RecurrenceOptions {
            mode: RecurrenceMode::Monthly,
            interval: 1,
            occurrences: 6,
        });

        let body = serde_json::to_value(new_event(&req)).unwrap();
        assert_eq!(body["isOnlineMeeting"], false);
        assert!(body.get("onlineMeetingProvider").is_none());
        assert_eq!(body["location"]["displayName"], "Room 4");
        assert_eq!(body["recurrence"]["pattern"]["dayOfMonth"], 3);
        assert_eq!(body["recurrence"]["range"]["numberOfOccurrences"], 6);
    }

    #[test]
    fn test_duration_is_clamped() {
        let start = Utc.with_ymd_and_hms(2025, 3, 3, 13, 0, 0).unwrap();
        let req = BookingRequest::starting_at(start, 1000, vec![]);
        assert_eq!(req.end - req.start, chrono::Duration::minutes(240));
    }

    #[tokio::test]
    async fn test_create_meeting() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/me/events")
            .match_body(Matcher::PartialJson(json!({
                "subject": "Meeting",
                "attendees": [{"emailAddress": {"address": "ada@contoso.com"}, "type": "required"}]
            })))
            .with_status(201)
            .with_body(
                r#"{"id":"evt1","subject":"Meeting",
                    "start":{"dateTime":"2025-03-03T13:00:00.0000000","timeZone":"UTC"},
                    "end":{"dateTime":"2025-03-03T13:30:00.0000000","timeZone":"UTC"},
                    "isOnlineMeeting":true,
                    "onlineMeeting":{"joinUrl":"https://teams.example/join"}}"#,
            )
            .create_async()
            .await;

        let client = GraphClient::new(&server.url(), "t");
        let event = create_meeting(&client, &booking()).await.unwrap();

        assert_eq!(event.id, "evt1");
        assert_eq!(
            event.online_meeting.and_then(|m| m.join_url).as_deref(),
            Some("https://teams.example/join")
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_meeting_rejection() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/me/events")
            .with_status(400)
            .with_body(r#"{"error":{"code":"ErrorInvalidRequest","message":"Your request can't be completed."}}"#)
            .create_async()
            .await;

        let client = GraphClient::new(&server.url(), "t");
        let err = create_meeting(&client, &booking()).await.unwrap_err();

        match err {
            GraphError::BookingFailed { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Your request can't be completed.");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_meeting_validates_before_sending() {
        let client = GraphClient::new("http://127.0.0.1:1", "t");
        let mut req = booking();
        req.end = req.start;
        assert!(matches!(
            create_meeting(&client, &req).await,
            Err(GraphError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_create_meeting_unreachable_is_not_a_rejection() {
        let client = GraphClient::new("http://127.0.0.1:1", "t");
        let err = create_meeting(&client, &booking()).await.unwrap_err();
        assert!(matches!(err, GraphError::Request(_)));
        assert_eq!(err.status(), None);
    }
}
