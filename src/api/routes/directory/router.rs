//! Router for the directory API

use axum::{Json, Router, extract::State, routing::get};
use axum_extra::extract::Query;
use http::HeaderMap;

use super::public;
use crate::api::public::ApiError;
use crate::api::state::SharedState;
use crate::api::utils::graph_client;
use crate::directory::{
    AttributeDistribution, AttributeField, AttributeQuery, attribute_values, normalize_user,
    run_query,
};

async fn users_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<public::UsersQuery>,
) -> Result<Json<public::UsersResponse>, ApiError> {
    let query = AttributeQuery::parse(
        &params.field,
        &params.value,
        params.field2.as_deref(),
        params.value2.as_deref(),
    )?;
    let client = graph_client(&state.config, &headers)?;
    let result = run_query(&client, &query).await?;

    Ok(Json(public::UsersResponse {
        filter: query.filter(),
        users: result.users.iter().map(normalize_user).collect(),
        total: result.total,
        truncated: result.truncated,
    }))
}

async fn attributes_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(params): Query<public::AttributesQuery>,
) -> Result<Json<AttributeDistribution>, ApiError> {
    let primary = AttributeField::parse(&params.primary)?;
    let secondary = params
        .secondary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(AttributeField::parse)
        .transpose()?;
    let client = graph_client(&state.config, &headers)?;
    let distribution =
        attribute_values(&client, &primary, secondary.as_ref(), params.pages).await?;
    Ok(Json(distribution))
}

/// Create the directory router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/users", get(users_handler))
        .route("/attributes", get(attributes_handler))
}
