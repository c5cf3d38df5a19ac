//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::{Router, body::Body};
use serde_json::Value;

use graphdesk::api::{AppState, SharedState, app};
use graphdesk::core::AppConfig;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_TENANT: &str = "contoso.com";

/// Config pointing Graph calls at a mock server
pub fn test_config(graph_base_url: &str, token: Option<&str>) -> AppConfig {
    AppConfig {
        graph_base_url: graph_base_url.trim_end_matches('/').to_string(),
        token: token.map(str::to_string),
        tenant_domain: Some(TEST_TENANT.to_string()),
        photo_concurrency: 2,
    }
}

/// Creates a test application router talking to `graph_base_url`
/// with a default token configured.
pub fn test_app(graph_base_url: &str) -> Router {
    test_app_with_state(test_config(graph_base_url, Some(TEST_TOKEN))).0
}

/// Router plus a handle on its state for assertions about the cache
pub fn test_app_with_state(config: AppConfig) -> (Router, SharedState) {
    let state = Arc::new(AppState::new(config));
    (app(Arc::clone(&state)), state)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_to_json(body: Body) -> Value {
    serde_json::from_str(&body_to_string(body).await).expect("Body is not JSON")
}
