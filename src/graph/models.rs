//! Graph resource types. Field names follow the Graph camelCase
//! properties.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Properties selected whenever users are fetched
pub const USER_SELECT_FIELDS: &[&str] = &[
    "id",
    "displayName",
    "mail",
    "userPrincipalName",
    "jobTitle",
    "department",
    "companyName",
    "givenName",
    "surname",
    "mobilePhone",
    "businessPhones",
    "officeLocation",
    "city",
    "country",
    "state",
    "streetAddress",
    "postalCode",
    "employeeId",
    "onPremisesDistinguishedName",
    "onPremisesDomainName",
    "onPremisesUserPrincipalName",
    "onPremisesSamAccountName",
    "assignedPlans",
    "provisionedPlans",
    "onPremisesExtensionAttributes",
];

pub const MANAGER_EXPAND: &str = "manager($select=displayName,mail,userPrincipalName,jobTitle)";

/// Graph `dateTimeTimeZone`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    pub date_time: String,
    pub time_zone: String,
}

impl DateTimeTimeZone {
    pub fn utc(dt: DateTime<Utc>) -> Self {
        Self {
            date_time: dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            time_zone: String::from("UTC"),
        }
    }

    /// Parse the timestamp, assuming UTC when Graph omits an offset
    /// (it does whenever `timeZone` is UTC).
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        parse_graph_datetime(&self.date_time)
    }
}

pub fn parse_graph_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailAddress {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
    pub display_name: Option<String>,
    pub mail: Option<String>,
    pub user_principal_name: Option<String>,
    pub job_title: Option<String>,
}

/// A directory user. Selected properties without a typed field are
/// kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default)]
    pub id: String,
    pub display_name: Option<String>,
    pub mail: Option<String>,
    pub user_principal_name: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub manager: Option<Manager>,
    pub on_premises_extension_attributes: Option<BTreeMap<String, Option<String>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Value of `extensionAttributeN`, empty when unset
    pub fn extension_attribute(&self, index: u8) -> &str {
        self.on_premises_extension_attributes
            .as_ref()
            .and_then(|attrs| attrs.get(&format!("extensionAttribute{}", index)))
            .and_then(|v| v.as_deref())
            .unwrap_or("")
    }

    /// Domain of the UPN, falling back to the mail address
    pub fn email_domain(&self) -> &str {
        fn domain_of(addr: &Option<String>) -> Option<&str> {
            addr.as_deref()
                .and_then(|a| a.split('@').nth(1))
                .filter(|d| !d.is_empty())
        }
        domain_of(&self.user_principal_name)
            .or_else(|| domain_of(&self.mail))
            .unwrap_or("")
    }

    /// String value of a plain Graph property
    pub fn property(&self, name: &str) -> &str {
        let typed = match name {
            "id" => Some(self.id.as_str()),
            "displayName" => self.display_name.as_deref(),
            "mail" => self.mail.as_deref(),
            "userPrincipalName" => self.user_principal_name.as_deref(),
            "jobTitle" => self.job_title.as_deref(),
            "department" => self.department.as_deref(),
            _ => self.extra.get(name).and_then(Value::as_str),
        };
        typed.unwrap_or("")
    }

    pub fn display_name_or_empty(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub display_name: Option<String>,
    pub mail: Option<String>,
    pub user_principal_name: Option<String>,
    pub job_title: Option<String>,
}

impl Profile {
    pub fn tenant_domain(&self) -> Option<String> {
        self.user_principal_name
            .as_deref()
            .and_then(|upn| upn.split('@').nth(1))
            .filter(|d| !d.is_empty())
            .map(str::to_lowercase)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email_address: EmailAddress,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineMeeting {
    pub join_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub subject: Option<String>,
    pub start: DateTimeTimeZone,
    pub end: DateTimeTimeZone,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub is_online_meeting: bool,
    pub online_meeting: Option<OnlineMeeting>,
    pub organizer: Option<Recipient>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    pub web_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub email_address: EmailAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub topic: Option<String>,
    pub chat_type: Option<String>,
    pub created_date_time: Option<String>,
    pub last_updated_date_time: Option<String>,
    pub web_url: Option<String>,
}

/// Member of a chat or channel (`aadUserConversationMember`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMember {
    pub id: String,
    pub display_name: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub display_name: Option<String>,
    pub membership_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
    pub id: String,
    pub availability: Option<String>,
    pub activity: Option<String>,
}
