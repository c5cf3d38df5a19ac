use std::env;

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";
pub const DEFAULT_PHOTO_CONCURRENCY: usize = 4;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub graph_base_url: String,
    pub token: Option<String>,
    pub tenant_domain: Option<String>,
    pub photo_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let graph_base_url = env::var("GRAPHDESK_GRAPH_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GRAPH_BASE_URL.to_string());
        let token = env::var("GRAPHDESK_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let tenant_domain = env::var("GRAPHDESK_TENANT_DOMAIN")
            .ok()
            .filter(|d| !d.trim().is_empty());
        let photo_concurrency = env::var("GRAPHDESK_PHOTO_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PHOTO_CONCURRENCY);

        Self {
            graph_base_url: graph_base_url.trim_end_matches('/').to_string(),
            token,
            tenant_domain,
            photo_concurrency,
        }
    }
}

impl AppConfig {
    /// Overlay command line values on top of the environment defaults
    pub fn with_overrides(mut self, token: Option<String>, base_url: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
        if let Some(base_url) = base_url {
            self.graph_base_url = base_url.trim_end_matches('/').to_string();
        }
        self
    }
}
