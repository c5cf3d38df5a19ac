//! Integration tests for the meetings, chats and teams endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use mockito::Matcher;
    use serial_test::serial;
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_json, test_app};

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Tests meetings are read from the calendar view in UTC
    #[tokio::test]
    #[serial]
    async fn it_lists_meetings() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/me/calendarView")
            .match_query(Matcher::UrlEncoded("$top".into(), "100".into()))
            .match_header("prefer", r#"outlook.timezone="UTC""#)
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(
                r#"{"value":[{"id":"e1","subject":null,
                    "start":{"dateTime":"2025-03-04T10:00:00.0000000","timeZone":"UTC"},
                    "end":{"dateTime":"2025-03-04T10:30:00.0000000","timeZone":"UTC"},
                    "isOnlineMeeting":true,
                    "onlineMeeting":{"joinUrl":"https://teams.example/j/1"},
                    "attendees":[{"type":"required","emailAddress":{"address":"ada@contoso.com","name":"Ada"}}]}]}"#,
            )
            .create_async()
            .await;

        let app = test_app(&server.url());
        let response = app.oneshot(get("/api/meetings?days_ahead=3")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["items"][0]["subject"], "No title");
        assert_eq!(body["items"][0]["join_url"], "https://teams.example/j/1");
        assert_eq!(body["items"][0]["attendees"][0]["kind"], "required");
        mock.assert_async().await;
    }

    /// Tests an expired token surfaces as unauthorized
    #[tokio::test]
    #[serial]
    async fn it_returns_401_when_graph_rejects_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/me/joinedTeams")
            .with_status(401)
            .with_body(r#"{"error":{"code":"InvalidAuthenticationToken","message":"Lifetime validation failed, the token is expired."}}"#)
            .create_async()
            .await;

        let app = test_app(&server.url());
        let response = app.oneshot(get("/api/teams")).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_to_json(response.into_body()).await;
        assert!(body["error"].as_str().unwrap().contains("token is expired"));
    }

    /// Tests channel listings follow continuation links
    #[tokio::test]
    #[serial]
    async fn it_lists_channels_across_pages() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let _first = server
            .mock("GET", "/teams/t1/channels")
            .with_status(200)
            .with_body(format!(
                r#"{{"value":[{{"id":"c1","displayName":"General"}}],"@odata.nextLink":"{}/teams/t1/channels/page2"}}"#,
                url
            ))
            .create_async()
            .await;
        let _second = server
            .mock("GET", "/teams/t1/channels/page2")
            .with_status(200)
            .with_body(r#"{"value":[{"id":"c2","displayName":"Random"}]}"#)
            .create_async()
            .await;

        let app = test_app(&url);
        let response = app.oneshot(get("/api/teams/t1/channels")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["items"][1]["displayName"], "Random");
        assert_eq!(body["truncated"], false);
    }
}
