use serde::Serialize;

use super::collation::NameOrder;
use super::filter::AttributeQuery;
use crate::graph::models::{MANAGER_EXPAND, USER_SELECT_FIELDS, UserRecord};
use crate::graph::{GraphClient, GraphError, MAX_PAGES};

pub const QUERY_PAGE_SIZE: usize = 50;
pub const MAX_QUERY_PAGES: usize = MAX_PAGES;

#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub users: Vec<UserRecord>,
    /// Users that passed every predicate, including local ones
    pub total: usize,
    pub pages: usize,
    /// Stopped at the page cap with more results pending
    pub truncated: bool,
}

/// Display name order under Swedish collation
pub fn sort_by_display_name(users: &mut [UserRecord]) {
    let order = NameOrder::swedish();
    users.sort_by(|a, b| order.compare(a.display_name_or_empty(), b.display_name_or_empty()));
}

/// Fetch every user matching the query. Graph filters what it can,
/// extension attributes are checked here. Any failed page fails the
/// whole query.
pub async fn run_query(
    client: &GraphClient,
    query: &AttributeQuery,
) -> Result<QueryResult, GraphError> {
    let mut params = vec![
        ("$count", String::from("true")),
        ("$top", QUERY_PAGE_SIZE.to_string()),
    ];
    if let Some(filter) = query.server_filter() {
        params.push(("$filter", filter));
    }
    params.push(("$select", USER_SELECT_FIELDS.join(",")));
    params.push(("$expand", MANAGER_EXPAND.to_string()));

    tracing::debug!("Running directory query {}", query.filter());
    let paged = client
        .get_all_pages::<UserRecord>(
            "/users",
            &params,
            &[("ConsistencyLevel", "eventual")],
            MAX_QUERY_PAGES,
        )
        .await?;

    let fetched = paged.items.len();
    let mut users: Vec<UserRecord> = paged
        .items
        .into_iter()
        .filter(|u| query.accepts(u))
        .collect();
    sort_by_display_name(&mut users);
    tracing::debug!(
        "Directory query kept {} of {} users over {} pages",
        users.len(),
        fetched,
        paged.pages
    );

    Ok(QueryResult {
        total: users.len(),
        users,
        pages: paged.pages,
        truncated: paged.truncated,
    })
}
