use anyhow::Result;
use chrono::{DateTime, Utc};
use serde_json::json;

use super::print_json;
use crate::core::AppConfig;
use crate::graph::GraphClient;
use crate::scheduler::recurrence::{RecurrenceMode, RecurrenceOptions};
use crate::scheduler::{BookingRequest, FindTimeRequest, create_meeting, find_first_available};

pub struct FindTimeArgs {
    pub attendees: Vec<String>,
    pub duration: i64,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub tenant_domain: Option<String>,
    pub work_hours: bool,
    pub book: bool,
    pub subject: Option<String>,
    pub recurrence: Option<RecurrenceMode>,
    pub occurrences: u32,
}

pub async fn run(config: &AppConfig, args: FindTimeArgs) -> Result<()> {
    let client = GraphClient::from_config(config)?;
    let configured = args
        .tenant_domain
        .as_deref()
        .or(config.tenant_domain.as_deref());
    let tenant_domain = client.tenant_domain(configured).await;

    let request = FindTimeRequest {
        attendees: args.attendees.clone(),
        duration_minutes: args.duration,
        window_start: args.start,
        window_end: args.end,
        tenant_domain: tenant_domain.clone(),
        work_hours_only: args.work_hours,
    };
    let Some(suggestion) = find_first_available(&client, &request).await? else {
        tracing::info!("No common time found in the window");
        return print_json(&json!({ "suggestion": null, "tenant_domain": tenant_domain }));
    };

    if !args.book {
        return print_json(&json!({ "suggestion": suggestion, "tenant_domain": tenant_domain }));
    }

    let mut booking = BookingRequest::for_suggestion(&suggestion, args.attendees);
    booking.subject = args.subject;
    booking.recurrence = args.recurrence.map(|mode| RecurrenceOptions {
        mode,
        interval: 1,
        occurrences: args.occurrences,
    });
    let event = create_meeting(&client, &booking).await?;

    print_json(&json!({
        "suggestion": suggestion,
        "event": event,
    }))
}
