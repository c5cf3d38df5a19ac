use anyhow::Result;
use serde_json::json;
use tokio::task::JoinSet;

use super::print_json;
use crate::core::AppConfig;
use crate::graph::GraphClient;
use crate::graph::chats::ChatMembersCache;

pub async fn me(config: &AppConfig) -> Result<()> {
    let client = GraphClient::from_config(config)?;
    let profile = client.me().await?;
    print_json(&json!({
        "profile": profile,
        "tenant_domain": profile.tenant_domain(),
    }))
}

pub async fn meetings(config: &AppConfig, days: i64) -> Result<()> {
    let client = GraphClient::from_config(config)?;
    let now = chrono::Utc::now();
    let events = client
        .calendar_view(now, now + chrono::Duration::days(days.max(1)))
        .await?;
    print_json(&events)
}

pub async fn chats(config: &AppConfig, with_members: bool) -> Result<()> {
    let client = GraphClient::from_config(config)?;
    let chats = client.chats().await?;
    if !with_members {
        return print_json(&chats);
    }

    // Fetch each chat's members concurrently
    let cache = ChatMembersCache::new();
    let mut tasks = JoinSet::new();
    for chat in chats.items.iter() {
        let client = client.clone();
        let cache = cache.clone();
        let chat_id = chat.id.clone();
        tasks.spawn(async move {
            let members = client.chat_members(&cache, &chat_id).await;
            (chat_id, members)
        });
    }
    while let Some(joined) = tasks.join_next().await {
        let (chat_id, members) = joined?;
        if let Err(e) = members {
            tracing::warn!("Could not list members of {}: {}", chat_id, e);
        }
    }

    let members = cache.session(client.token());
    let items: Vec<_> = chats
        .items
        .iter()
        .map(|chat| {
            json!({
                "chat": chat,
                "members": members.get(&chat.id).unwrap_or_default(),
            })
        })
        .collect();
    print_json(&json!({ "items": items, "truncated": chats.truncated }))
}

pub async fn teams(config: &AppConfig, with_channels: bool) -> Result<()> {
    let client = GraphClient::from_config(config)?;
    let teams = client.joined_teams().await?;
    if !with_channels {
        return print_json(&teams);
    }

    let mut items = Vec::with_capacity(teams.items.len());
    for team in teams.items.iter() {
        let channels = client.channels(&team.id).await?;
        items.push(json!({ "team": team, "channels": channels.items }));
    }
    print_json(&json!({ "items": items, "truncated": teams.truncated }))
}
