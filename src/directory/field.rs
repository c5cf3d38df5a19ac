use std::fmt;

use crate::graph::GraphError;
use crate::graph::models::UserRecord;

/// Synthetic name for the domain of the UPN or mail address
pub const EMAIL_DOMAIN_FIELD: &str = "upnDomain";
const EXTENSION_PREFIX: &str = "extensionAttribute";
pub const EXTENSION_CONTAINER: &str = "onPremisesExtensionAttributes";

/// A user attribute that can be grouped on or filtered by
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeField {
    /// A plain Graph user property such as `department`
    Native(String),
    EmailDomain,
    /// `onPremisesExtensionAttributes/extensionAttributeN`, 1 to 15.
    /// Graph won't filter on these so they are matched locally.
    Extension(u8),
}

impl AttributeField {
    pub fn parse(name: &str) -> Result<Self, GraphError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GraphError::InvalidInput(String::from(
                "field name is empty",
            )));
        }
        if name == EMAIL_DOMAIN_FIELD {
            return Ok(AttributeField::EmailDomain);
        }
        if let Some(index) = name.strip_prefix(EXTENSION_PREFIX) {
            return match index.parse::<u8>() {
                Ok(n) if (1..=15).contains(&n) => Ok(AttributeField::Extension(n)),
                _ => Err(GraphError::InvalidInput(format!(
                    "{} is not an extension attribute (1-15)",
                    name
                ))),
            };
        }
        Ok(AttributeField::Native(name.to_string()))
    }

    /// Path used in a `$filter` expression
    pub fn filter_path(&self) -> String {
        match self {
            AttributeField::Native(name) => name.clone(),
            AttributeField::EmailDomain => EMAIL_DOMAIN_FIELD.to_string(),
            AttributeField::Extension(n) => {
                format!("{}/{}{}", EXTENSION_CONTAINER, EXTENSION_PREFIX, n)
            }
        }
    }

    /// Whether Graph can evaluate a predicate on this field
    pub fn is_server_filterable(&self) -> bool {
        !matches!(self, AttributeField::Extension(_))
    }

    /// Properties to `$select` to be able to read this field
    pub fn select_properties(&self) -> Vec<&str> {
        match self {
            AttributeField::Native(name) => vec![name.as_str()],
            AttributeField::EmailDomain => vec!["userPrincipalName", "mail"],
            AttributeField::Extension(_) => vec![EXTENSION_CONTAINER],
        }
    }

    /// The field's value on a user, empty when unset
    pub fn value_of<'a>(&self, user: &'a UserRecord) -> &'a str {
        match self {
            AttributeField::Native(name) => user.property(name),
            AttributeField::EmailDomain => user.email_domain(),
            AttributeField::Extension(n) => user.extension_attribute(*n),
        }
    }
}

impl fmt::Display for AttributeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeField::Native(name) => write!(f, "{}", name),
            AttributeField::EmailDomain => write!(f, "{}", EMAIL_DOMAIN_FIELD),
            AttributeField::Extension(n) => write!(f, "{}{}", EXTENSION_PREFIX, n),
        }
    }
}
