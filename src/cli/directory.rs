use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use super::print_json;
use crate::core::AppConfig;
use crate::directory::{
    AttributeField, AttributeQuery, attribute_values, normalize_user, run_query,
};
use crate::graph::GraphClient;

pub async fn users(
    config: &AppConfig,
    field: &str,
    value: &str,
    field2: Option<&str>,
    value2: Option<&str>,
) -> Result<()> {
    let query = AttributeQuery::parse(field, value, field2, value2)?;
    let client = GraphClient::from_config(config)?;
    let result = run_query(&client, &query).await?;

    let users: Vec<_> = result.users.iter().map(normalize_user).collect();
    print_json(&json!({
        "filter": query.filter(),
        "total": result.total,
        "truncated": result.truncated,
        "users": users,
    }))
}

pub async fn attributes(
    config: &AppConfig,
    primary: &str,
    secondary: Option<&str>,
    pages: Option<usize>,
) -> Result<()> {
    let primary = AttributeField::parse(primary)?;
    let secondary = secondary.map(AttributeField::parse).transpose()?;
    let client = GraphClient::from_config(config)?;
    let distribution = attribute_values(&client, &primary, secondary.as_ref(), pages).await?;
    print_json(&distribution)
}

/// File name for a user's photo, safe for any id or UPN
fn photo_file_name(user: &str) -> String {
    let stem: String = user
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!("{}.jpg", stem)
}

pub async fn photos(config: &AppConfig, users: &[String], out: &str) -> Result<()> {
    let client = GraphClient::from_config(config)?;
    let out_dir = Path::new(out);
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out))?;

    let photos = client
        .download_photos(users, config.photo_concurrency)
        .await;
    for photo in photos.iter() {
        let path = out_dir.join(photo_file_name(&photo.user));
        tokio::fs::write(&path, &photo.bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    tracing::info!("Saved {} of {} photos", photos.len(), users.len());
    print_json(&json!({
        "requested": users.len(),
        "saved": photos,
    }))
}
