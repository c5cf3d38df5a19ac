//! Recurrence patterns attached to a booked meeting

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceMode {
    Weekly,
    /// Every other week, interval fixed at 2
    Biweekly,
    Monthly,
    /// Every third month, interval fixed at 3
    Quarterly,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceOptions {
    pub mode: RecurrenceMode,
    #[serde(default = "one")]
    pub interval: u32,
    #[serde(default = "one")]
    pub occurrences: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePattern {
    #[serde(rename = "type")]
    pub kind: String,
    pub interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_day_of_week: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRange {
    #[serde(rename = "type")]
    pub kind: String,
    pub start_date: String,
    pub number_of_occurrences: u32,
    pub recurrence_time_zone: String,
}

/// Graph `patternedRecurrence`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternedRecurrence {
    pub pattern: RecurrencePattern,
    pub range: RecurrenceRange,
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

impl RecurrenceOptions {
    /// Build the pattern anchored on the first occurrence. Interval and
    /// count are floored at 1; nothing else is validated.
    pub fn pattern_from(&self, start: DateTime<Utc>) -> PatternedRecurrence {
        let interval = self.interval.max(1);
        let occurrences = self.occurrences.max(1);

        let pattern = match self.mode {
            RecurrenceMode::Weekly | RecurrenceMode::Biweekly => RecurrencePattern {
                kind: String::from("weekly"),
                interval: if self.mode == RecurrenceMode::Biweekly {
                    2
                } else {
                    interval
                },
                days_of_week: Some(vec![weekday_name(start.weekday()).to_string()]),
                first_day_of_week: Some(String::from("monday")),
                day_of_month: None,
            },
            RecurrenceMode::Monthly | RecurrenceMode::Quarterly => RecurrencePattern {
                kind: String::from("absoluteMonthly"),
                interval: if self.mode == RecurrenceMode::Quarterly {
                    3
                } else {
                    interval
                },
                days_of_week: None,
                first_day_of_week: None,
                day_of_month: Some(start.day()),
            },
        };

        PatternedRecurrence {
            pattern,
            range: RecurrenceRange {
                kind: String::from("numbered"),
                start_date: start.format("%Y-%m-%d").to_string(),
                number_of_occurrences: occurrences,
                recurrence_time_zone: String::from("UTC"),
            },
        }
    }
}
