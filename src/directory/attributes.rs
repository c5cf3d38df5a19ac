//! Distribution of attribute values across the directory

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::collation::NameOrder;
use super::field::AttributeField;
use crate::graph::models::UserRecord;
use crate::graph::{GraphClient, GraphError, MAX_PAGES};

const DISTRIBUTION_PAGE_SIZE: usize = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub k1: String,
    pub k2: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeDistribution {
    pub primary: String,
    pub secondary: Option<String>,
    pub values: Vec<ValueCount>,
    pub users_seen: usize,
    pub pages: usize,
    /// False when the page limit stopped the scan early
    pub complete: bool,
}

/// Minimal `$select` able to read both fields
pub fn select_for(primary: &AttributeField, secondary: Option<&AttributeField>) -> String {
    let mut props = BTreeSet::from(["id"]);
    props.extend(primary.select_properties());
    if let Some(field) = secondary {
        props.extend(field.select_properties());
    }
    props.into_iter().collect::<Vec<_>>().join(",")
}

/// Count distinct `(primary, secondary)` value pairs. Users without a
/// primary value are skipped. Sorted by count, then by the values.
pub fn count_values(
    users: &[UserRecord],
    primary: &AttributeField,
    secondary: Option<&AttributeField>,
) -> Vec<ValueCount> {
    let mut counts: HashMap<(String, String), usize> = HashMap::new();
    for user in users {
        let k1 = primary.value_of(user).trim();
        if k1.is_empty() {
            continue;
        }
        let k2 = secondary.map(|f| f.value_of(user).trim()).unwrap_or("");
        *counts.entry((k1.to_string(), k2.to_string())).or_default() += 1;
    }

    let mut values: Vec<ValueCount> = counts
        .into_iter()
        .map(|((k1, k2), count)| ValueCount { k1, k2, count })
        .collect();
    let order = NameOrder::swedish();
    values.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| order.compare(&a.k1, &b.k1))
            .then_with(|| order.compare(&a.k2, &b.k2))
    });
    values
}

pub async fn attribute_values(
    client: &GraphClient,
    primary: &AttributeField,
    secondary: Option<&AttributeField>,
    page_limit: Option<usize>,
) -> Result<AttributeDistribution, GraphError> {
    let page_limit = page_limit.unwrap_or(MAX_PAGES).clamp(1, MAX_PAGES);
    let params = [
        ("$select", select_for(primary, secondary)),
        ("$top", DISTRIBUTION_PAGE_SIZE.to_string()),
    ];
    let paged = client
        .get_all_pages::<UserRecord>("/users", &params, &[], page_limit)
        .await?;

    Ok(AttributeDistribution {
        primary: primary.to_string(),
        secondary: secondary.map(|f| f.to_string()),
        values: count_values(&paged.items, primary, secondary),
        users_seen: paged.items.len(),
        pages: paged.pages,
        complete: !paged.truncated,
    })
}
