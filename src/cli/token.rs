use anyhow::{Result, anyhow};
use serde_json::json;

use super::print_json;
use crate::core::AppConfig;
use crate::core::token::TokenHints;

pub fn run(config: &AppConfig) -> Result<()> {
    let token = config
        .token
        .as_deref()
        .ok_or_else(|| anyhow!("Pass --token or set GRAPHDESK_TOKEN"))?;
    let hints = TokenHints::decode(token).ok_or_else(|| anyhow!("Token is not a JWT"))?;
    let now = chrono::Utc::now();

    print_json(&json!({
        "user": hints.user,
        "tenant_id": hints.tenant_id,
        "scopes": hints.scopes,
        "expires_at": hints.expires_at,
        "expired": hints.is_expired(now),
        "minutes_left": hints.expires_at.map(|exp| (exp - now).num_minutes().max(0)),
    }))
}
