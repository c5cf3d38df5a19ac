//! Profile, user lookup, presence and photos

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::models::{MANAGER_EXPAND, Presence, Profile, USER_SELECT_FIELDS, UserRecord};
use super::{GraphClient, GraphError};

#[derive(Deserialize)]
struct PresenceResponse {
    #[serde(default)]
    value: Vec<Presence>,
}

/// A downloaded profile photo
#[derive(Debug, Clone, Serialize)]
pub struct Photo {
    pub user: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub size: usize,
}

impl GraphClient {
    pub async fn me(&self) -> Result<Profile, GraphError> {
        self.get_json("/me", &[]).await
    }

    /// The configured tenant domain, else the domain of the signed in
    /// user's UPN. `None` if neither is known.
    pub async fn tenant_domain(&self, configured: Option<&str>) -> Option<String> {
        if let Some(domain) = configured.map(str::trim).filter(|d| !d.is_empty()) {
            return Some(domain.to_lowercase());
        }
        match self.me().await {
            Ok(profile) => profile.tenant_domain(),
            Err(e) => {
                tracing::warn!("Could not derive tenant domain from profile: {}", e);
                None
            }
        }
    }

    /// Look up a single user by object id or UPN
    pub async fn user(&self, id_or_upn: &str) -> Result<UserRecord, GraphError> {
        let path = format!("/users/{}", urlencoding::encode(id_or_upn));
        self.get_json(
            &path,
            &[
                ("$select", USER_SELECT_FIELDS.join(",")),
                ("$expand", MANAGER_EXPAND.to_string()),
            ],
        )
        .await
    }

    pub async fn presences(&self, user_ids: &[String]) -> Result<Vec<Presence>, GraphError> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }
        let resp: PresenceResponse = self
            .post_json(
                "/communications/getPresencesByUserId",
                &json!({ "ids": user_ids }),
            )
            .await?;
        Ok(resp.value)
    }

    /// Profile photo bytes, `None` when the user has no photo
    pub async fn photo(&self, user: &str) -> Result<Option<Vec<u8>>, GraphError> {
        let path = format!("/users/{}/photo/$value", urlencoding::encode(user));
        self.get_bytes(&path).await
    }

    /// Download photos with at most `concurrency` requests in flight.
    /// Users without a photo or whose fetch fails are skipped.
    pub async fn download_photos(&self, users: &[String], concurrency: usize) -> Vec<Photo> {
        let concurrency = concurrency.max(1);
        stream::iter(users.iter().cloned())
            .map(|user| async move {
                match self.photo(&user).await {
                    Ok(Some(bytes)) => Some(Photo {
                        size: bytes.len(),
                        user,
                        bytes,
                    }),
                    Ok(None) => None,
                    Err(e) => {
                        tracing::warn!("Photo download failed for {}: {}", user, e);
                        None
                    }
                }
            })
            .buffer_unordered(concurrency)
            .filter_map(|photo| async move { photo })
            .collect()
            .await
    }
}
