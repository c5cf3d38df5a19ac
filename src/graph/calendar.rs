//! Calendar view of the signed in user's meetings

use chrono::{DateTime, SecondsFormat, Utc};

use super::models::Event;
use super::{GraphClient, GraphError, MAX_PAGES, Paged};

const OUTLOOK_TIMEZONE_HEADER: &str = r#"outlook.timezone="UTC""#;

impl GraphClient {
    /// Meetings overlapping `[start, end)`, ordered by start time
    pub async fn calendar_view(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Paged<Event>, GraphError> {
        if end <= start {
            return Err(GraphError::InvalidInput(String::from(
                "calendar window must end after it starts",
            )));
        }
        self.get_all_pages(
            "/me/calendarView",
            &[
                (
                    "startDateTime",
                    start.to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                ("endDateTime", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("$top", "100".to_string()),
                ("$orderby", "start/dateTime".to_string()),
            ],
            &[("Prefer", OUTLOOK_TIMEZONE_HEADER)],
            MAX_PAGES,
        )
        .await
    }
}
