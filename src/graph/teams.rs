//! Joined Teams, their channels and channel membership

use super::models::{Channel, ConversationMember, Team};
use super::{GraphClient, GraphError, MAX_PAGES, Paged};

impl GraphClient {
    pub async fn joined_teams(&self) -> Result<Paged<Team>, GraphError> {
        self.get_all_pages("/me/joinedTeams", &[], &[], MAX_PAGES)
            .await
    }

    pub async fn channels(&self, team_id: &str) -> Result<Paged<Channel>, GraphError> {
        let path = format!("/teams/{}/channels", urlencoding::encode(team_id));
        self.get_all_pages(&path, &[], &[], MAX_PAGES).await
    }

    pub async fn channel_members(
        &self,
        team_id: &str,
        channel_id: &str,
    ) -> Result<Paged<ConversationMember>, GraphError> {
        let path = format!(
            "/teams/{}/channels/{}/members",
            urlencoding::encode(team_id),
            urlencoding::encode(channel_id)
        );
        self.get_all_pages(&path, &[], &[], MAX_PAGES).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_members_follow_pages() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let _first = server
            .mock("GET", "/teams/t1/channels/ch1/members")
            .with_status(200)
            .with_body(format!(
                r#"{{"value":[{{"id":"m1","displayName":"Ada"}}],"@odata.nextLink":"{}/teams/t1/channels/ch1/members/next"}}"#,
                url
            ))
            .create_async()
            .await;
        let _second = server
            .mock("GET", "/teams/t1/channels/ch1/members/next")
            .with_status(200)
            .with_body(r#"{"value":[{"id":"m2","displayName":"Bob"}],"@odata.nextLink":""}"#)
            .create_async()
            .await;

        let client = GraphClient::new(&url, "t");
        let members = client.channel_members("t1", "ch1").await.unwrap();

        let names: Vec<_> = members
            .items
            .iter()
            .filter_map(|m| m.display_name.clone())
            .collect();
        assert_eq!(names, vec!["Ada", "Bob"]);
        assert_eq!(members.pages, 2);
    }

    #[tokio::test]
    async fn test_joined_teams() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/me/joinedTeams")
            .with_status(200)
            .with_body(r#"{"value":[{"id":"t1","displayName":"Platform","description":null}]}"#)
            .create_async()
            .await;

        let client = GraphClient::new(&server.url(), "t");
        let teams = client.joined_teams().await.unwrap();
        assert_eq!(teams.items[0].display_name.as_deref(), Some("Platform"));
    }
}
