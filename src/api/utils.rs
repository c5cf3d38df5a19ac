use http::{HeaderMap, header};

use crate::core::AppConfig;
use crate::core::token::bearer_token;
use crate::graph::{GraphClient, GraphError};

/// Bearer token from the `Authorization` header, if one was sent
pub fn request_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(bearer_token)
        .filter(|t| !t.is_empty())
}

/// Token a request acts with: the caller's, else the configured one
pub fn session_token<'a>(config: &'a AppConfig, headers: &'a HeaderMap) -> Option<&'a str> {
    request_token(headers)
        .or(config.token.as_deref().map(bearer_token))
        .filter(|t| !t.is_empty())
}

/// Client for the caller's token, falling back to the configured one
pub fn graph_client(config: &AppConfig, headers: &HeaderMap) -> Result<GraphClient, GraphError> {
    match request_token(headers) {
        Some(token) => Ok(GraphClient::new(&config.graph_base_url, token)),
        None => GraphClient::from_config(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn config(token: Option<&str>) -> AppConfig {
        AppConfig {
            graph_base_url: String::from("http://localhost:1"),
            token: token.map(str::to_string),
            tenant_domain: None,
            photo_concurrency: 4,
        }
    }

    #[test]
    fn test_request_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(request_token(&headers), Some("abc"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(request_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer"));
        assert_eq!(request_token(&headers), None);
    }

    #[test]
    fn test_session_token_prefers_request() {
        let mut headers = HeaderMap::new();
        let cfg = config(Some("Bearer cfg"));
        assert_eq!(session_token(&cfg, &headers), Some("cfg"));
        assert_eq!(session_token(&config(None), &headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer mine"));
        assert_eq!(session_token(&cfg, &headers), Some("mine"));
    }

    #[test]
    fn test_graph_client_falls_back_to_config() {
        let headers = HeaderMap::new();
        assert!(graph_client(&config(Some("cfg")), &headers).is_ok());
        assert!(matches!(
            graph_client(&config(None), &headers),
            Err(GraphError::Unauthorized { status: 401, .. })
        ));
    }
}
