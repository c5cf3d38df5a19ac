//! Integration tests for the schedule API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use mockito::Matcher;
    use serde_json::json;
    use serial_test::serial;
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_json, test_app, test_app_with_state, test_config};

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn find_body() -> serde_json::Value {
        json!({
            "attendees": ["ada@contoso.com", "eve@fabrikam.com"],
            "duration_minutes": 45,
            "window_start": "2025-03-03T08:00:00Z",
            "window_end": "2025-03-07T17:00:00Z"
        })
    }

    /// Tests the relaxed attempt is used when the strict one finds nothing
    #[tokio::test]
    #[serial]
    async fn it_falls_back_to_optional_externals() {
        let mut server = mockito::Server::new_async().await;
        let strict = server
            .mock("POST", "/me/findMeetingTimes")
            .match_body(Matcher::PartialJson(json!({"minimumAttendeePercentage": 1.0})))
            .with_status(200)
            .with_body(r#"{"meetingTimeSuggestions":[],"emptySuggestionsReason":"AttendeesUnavailable"}"#)
            .expect(1)
            .create_async()
            .await;
        let relaxed = server
            .mock("POST", "/me/findMeetingTimes")
            .match_body(Matcher::PartialJson(json!({
                "minimumAttendeePercentage": 0.5,
                "meetingDuration": "PT45M"
            })))
            .with_status(200)
            .with_body(
                r#"{"meetingTimeSuggestions":[
                    {"confidence":50.0,"meetingTimeSlot":{
                        "start":{"dateTime":"2025-03-04T10:00:00.0000000","timeZone":"UTC"},
                        "end":{"dateTime":"2025-03-04T10:45:00.0000000","timeZone":"UTC"}}},
                    {"confidence":50.0,"meetingTimeSlot":{
                        "start":{"dateTime":"2025-03-03T15:00:00.0000000","timeZone":"UTC"},
                        "end":{"dateTime":"2025-03-03T15:45:00.0000000","timeZone":"UTC"}}}
                ]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let app = test_app(&server.url());
        let response = app
            .oneshot(post_json("/api/schedule/find", find_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["suggestion"]["attempt"], "external_optional");
        assert_eq!(body["suggestion"]["start"], "2025-03-03T15:00:00Z");
        assert_eq!(body["tenant_domain"], "contoso.com");
        strict.assert_async().await;
        relaxed.assert_async().await;
    }

    /// Tests a null suggestion when every attempt comes back empty
    #[tokio::test]
    #[serial]
    async fn it_returns_null_when_nothing_is_free() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/me/findMeetingTimes")
            .with_status(200)
            .with_body(r#"{"meetingTimeSuggestions":[]}"#)
            .expect(3)
            .create_async()
            .await;

        let app = test_app(&server.url());
        let response = app
            .oneshot(post_json("/api/schedule/find", find_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert!(body["suggestion"].is_null());
        mock.assert_async().await;
    }

    /// Tests blank attendee lists are rejected before calling Graph
    #[tokio::test]
    #[serial]
    async fn it_returns_400_without_attendees() {
        let server = mockito::Server::new_async().await;
        let app = test_app(&server.url());

        let response = app
            .oneshot(post_json("/api/schedule/find", json!({"attendees": ["  "]})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Tests requests without any token are unauthorized
    #[tokio::test]
    #[serial]
    async fn it_returns_401_without_token() {
        let server = mockito::Server::new_async().await;
        let (app, _) = test_app_with_state(test_config(&server.url(), None));

        let response = app
            .oneshot(post_json("/api/schedule/find", find_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    /// Tests booking with the caller's own token
    #[tokio::test]
    #[serial]
    async fn it_books_with_caller_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/me/events")
            .match_header("authorization", "Bearer caller-token")
            .match_body(Matcher::PartialJson(json!({
                "subject": "Planning",
                "onlineMeetingProvider": "teamsForBusiness",
                "recurrence": {"pattern": {"type": "weekly", "interval": 2}}
            })))
            .with_status(201)
            .with_body(
                r#"{"id":"evt-9","subject":"Planning",
                    "start":{"dateTime":"2025-03-04T10:00:00.0000000","timeZone":"UTC"},
                    "end":{"dateTime":"2025-03-04T10:30:00.0000000","timeZone":"UTC"},
                    "onlineMeeting":{"joinUrl":"https://teams.example/j/9"}}"#,
            )
            .create_async()
            .await;

        let app = test_app(&server.url());
        let mut request = post_json(
            "/api/schedule/book",
            json!({
                "subject": "Planning",
                "attendees": ["ada@contoso.com"],
                "start": "2025-03-04T10:00:00Z",
                "end": "2025-03-04T10:30:00Z",
                "recurrence": {"mode": "biweekly", "occurrences": 4}
            }),
        );
        request
            .headers_mut()
            .insert("authorization", "Bearer caller-token".parse().unwrap());

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["id"], "evt-9");
        assert_eq!(body["join_url"], "https://teams.example/j/9");
        mock.assert_async().await;
    }

    /// Tests a rejected booking surfaces Graph's status and message
    #[tokio::test]
    #[serial]
    async fn it_returns_502_when_booking_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/me/events")
            .with_status(400)
            .with_body(r#"{"error":{"code":"ErrorInvalidRequest","message":"Invalid attendee."}}"#)
            .create_async()
            .await;

        let app = test_app(&server.url());
        let response = app
            .oneshot(post_json(
                "/api/schedule/book",
                json!({
                    "attendees": ["nobody"],
                    "start": "2025-03-04T10:00:00Z",
                    "end": "2025-03-04T10:30:00Z"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["remote_status"], 400);
        assert!(body["error"].as_str().unwrap().contains("Invalid attendee."));
    }
}
