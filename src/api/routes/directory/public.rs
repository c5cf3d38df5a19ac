//! Public types for the directory API
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize)]
pub struct UsersQuery {
    pub field: String,
    pub value: String,
    pub field2: Option<String>,
    pub value2: Option<String>,
}

#[derive(Serialize)]
pub struct UsersResponse {
    pub filter: String,
    /// Users flattened for display, sorted by display name
    pub users: Vec<Value>,
    pub total: usize,
    pub truncated: bool,
}

#[derive(Deserialize)]
pub struct AttributesQuery {
    pub primary: String,
    pub secondary: Option<String>,
    /// Maximum number of pages to scan
    pub pages: Option<usize>,
}
