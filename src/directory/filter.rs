//! OData `$filter` construction for attribute queries

use serde::Serialize;

use super::field::AttributeField;
use crate::graph::GraphError;
use crate::graph::models::UserRecord;

/// Quote a value for an OData string literal
pub fn escape_value(value: &str) -> String {
    value.replace('\'', "''")
}

fn expression(field: &AttributeField, value: &str) -> String {
    let value = escape_value(value);
    match field {
        AttributeField::EmailDomain => format!(
            "(endswith(userPrincipalName,'@{}') or endswith(mail,'@{}'))",
            value, value
        ),
        _ => format!("{} eq '{}'", field.filter_path(), value),
    }
}

/// The full filter over both predicates, including ones Graph can't
/// evaluate. The second predicate is only added when both its field and
/// value are given.
pub fn build_filter(
    field1: &AttributeField,
    value1: &str,
    field2: Option<&AttributeField>,
    value2: Option<&str>,
) -> String {
    let mut filter = expression(field1, value1);
    if let (Some(field), Some(value)) = (field2, value2) {
        filter.push_str(" and ");
        filter.push_str(&expression(field, value));
    }
    filter
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    #[serde(serialize_with = "serialize_field")]
    pub field: AttributeField,
    pub value: String,
}

fn serialize_field<S: serde::Serializer>(field: &AttributeField, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(field)
}

impl Predicate {
    pub fn new(field: AttributeField, value: &str) -> Result<Self, GraphError> {
        let value = value.trim();
        if value.is_empty() && field.is_server_filterable() {
            return Err(GraphError::InvalidInput(format!(
                "a value is required for {}",
                field
            )));
        }
        Ok(Self {
            field,
            value: value.to_string(),
        })
    }

    /// Exact match on the user's value. A missing value counts as empty.
    pub fn matches(&self, user: &UserRecord) -> bool {
        self.field.value_of(user) == self.value
    }
}

/// One or two conjoined predicates over user attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeQuery {
    pub primary: Predicate,
    pub secondary: Option<Predicate>,
}

impl AttributeQuery {
    /// Build a query from field names. The secondary predicate is used
    /// only when both its field and value are supplied.
    pub fn parse(
        field: &str,
        value: &str,
        field2: Option<&str>,
        value2: Option<&str>,
    ) -> Result<Self, GraphError> {
        let primary = Predicate::new(AttributeField::parse(field)?, value)?;
        let secondary = match (
            field2.filter(|f| !f.trim().is_empty()),
            value2,
        ) {
            (Some(f), Some(v)) => Some(Predicate::new(AttributeField::parse(f)?, v)?),
            _ => None,
        };
        Ok(Self { primary, secondary })
    }

    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }

    pub fn filter(&self) -> String {
        build_filter(
            &self.primary.field,
            &self.primary.value,
            self.secondary.as_ref().map(|p| &p.field),
            self.secondary.as_ref().map(|p| p.value.as_str()),
        )
    }

    /// The part of the filter Graph can evaluate, if any
    pub fn server_filter(&self) -> Option<String> {
        let clauses: Vec<String> = self
            .predicates()
            .filter(|p| p.field.is_server_filterable())
            .map(|p| expression(&p.field, &p.value))
            .collect();
        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" and "))
        }
    }

    /// Predicates that have to be checked after fetching
    pub fn client_predicates(&self) -> Vec<&Predicate> {
        self.predicates()
            .filter(|p| !p.field.is_server_filterable())
            .collect()
    }

    /// Whether a fetched user passes every locally evaluated predicate
    pub fn accepts(&self, user: &UserRecord) -> bool {
        self.client_predicates().iter().all(|p| p.matches(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value("O'Brien"), "O''Brien");
        assert_eq!(escape_value("''"), "''''");
    }

    #[test]
    fn test_build_filter_native_with_quote() {
        let field = AttributeField::parse("surname").unwrap();
        assert_eq!(build_filter(&field, "O'Brien", None, None), "surname eq 'O''Brien'");
    }

    #[test]
    fn test_build_filter_domain_and_extension() {
        let filter = build_filter(
            &AttributeField::EmailDomain,
            "contoso.com",
            Some(&AttributeField::Extension(2)),
            Some("B"),
        );
        assert_eq!(
            filter,
            "(endswith(userPrincipalName,'@contoso.com') or endswith(mail,'@contoso.com')) \
             and onPremisesExtensionAttributes/extensionAttribute2 eq 'B'"
        );
    }

    #[test]
    fn test_build_filter_ignores_half_given_second_predicate() {
        let field = AttributeField::parse("department").unwrap();
        let city = AttributeField::parse("city").unwrap();
        assert_eq!(
            build_filter(&field, "Sales", Some(&city), None),
            "department eq 'Sales'"
        );
    }

    #[test]
    fn test_server_filter_excludes_extensions() {
        let query =
            AttributeQuery::parse("department", "Sales", Some("extensionAttribute1"), Some("X"))
                .unwrap();
        assert_eq!(query.server_filter().as_deref(), Some("department eq 'Sales'"));
        assert_eq!(query.client_predicates().len(), 1);

        let query = AttributeQuery::parse("extensionAttribute1", "X", None, None).unwrap();
        assert_eq!(query.server_filter(), None);
    }

    #[test]
    fn test_empty_values() {
        assert!(AttributeQuery::parse("department", " ", None, None).is_err());
        assert!(AttributeQuery::parse("upnDomain", "", None, None).is_err());

        let query = AttributeQuery::parse("extensionAttribute9", "", None, None).unwrap();
        assert!(query.accepts(&UserRecord::default()));
    }

    #[test]
    fn test_secondary_needs_field_and_value() {
        let query = AttributeQuery::parse("department", "Sales", Some(""), Some("x")).unwrap();
        assert!(query.secondary.is_none());
        let query = AttributeQuery::parse("department", "Sales", Some("city"), None).unwrap();
        assert!(query.secondary.is_none());
    }
}
