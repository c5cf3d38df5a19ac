//! Bearer authenticated client for the Microsoft Graph REST API

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::GraphError;
use crate::core::AppConfig;
use crate::core::token::bearer_token;

/// Safety bound on how many continuation links are followed. Result
/// sets larger than this are truncated, not complete.
pub const MAX_PAGES: usize = 50;

/// One page of a Graph collection response
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

impl<T> Page<T> {
    /// Continuation link, treating an empty link as the end
    pub fn next(&self) -> Option<&str> {
        self.next_link.as_deref().filter(|l| !l.is_empty())
    }
}

/// Items accumulated across pages
#[derive(Debug, Clone, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub pages: usize,
    /// A continuation link was still pending when the page cap was hit
    pub truncated: bool,
}

#[derive(Clone, Debug)]
pub struct GraphClient {
    http: Client,
    base_url: String,
    token: String,
}

impl GraphClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    pub fn with_client(http: Client, base_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: bearer_token(token).to_string(),
        }
    }

    /// Bearer token this client sends, without the scheme
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Build a client from config, failing if no token was supplied
    pub fn from_config(config: &AppConfig) -> Result<Self, GraphError> {
        let token = config
            .token
            .as_deref()
            .map(bearer_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GraphError::Unauthorized {
                status: 401,
                message: String::from("no bearer token supplied"),
            })?;
        Ok(Self::new(&config.graph_base_url, token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the API root. Absolute URLs
    /// (continuation links) pass through untouched.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.token)
    }

    /// Send a request and turn any non-2xx status into a `GraphError`
    pub async fn send(&self, req: RequestBuilder) -> Result<Response, GraphError> {
        let res = req.send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let text = res.text().await.unwrap_or_default();
        tracing::debug!("Graph responded {}: {}", status, text);
        Err(GraphError::from_response(status, &text))
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GraphError> {
        let res = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        let text = res.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GraphError> {
        let res = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        let text = res.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// POST that expects no meaningful response body, returning the status
    pub async fn post_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<StatusCode, GraphError> {
        let res = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        Ok(res.status())
    }

    /// Raw bytes of a binary resource. `Ok(None)` when it doesn't exist.
    pub async fn get_bytes(&self, path: &str) -> Result<Option<Vec<u8>>, GraphError> {
        let res = self.request(Method::GET, path).send().await?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(GraphError::from_response(status, &text));
        }
        Ok(Some(res.bytes().await?.to_vec()))
    }

    pub async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> Result<Page<T>, GraphError> {
        let mut req = self.request(Method::GET, url).query(query);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let res = self.send(req).await?;
        let text = res.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Follow continuation links until they run out or `max_pages`
    /// pages have been read. The query only applies to the first
    /// request since continuation links already carry it. Any failure
    /// aborts the whole walk.
    pub async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        headers: &[(&str, &str)],
        max_pages: usize,
    ) -> Result<Paged<T>, GraphError> {
        let mut items = Vec::new();
        let mut pages = 0;
        let mut next: Option<String> = Some(path.to_string());

        while let Some(url) = next.take() {
            if pages >= max_pages {
                tracing::warn!(
                    "Stopped paging {} after {} pages with more results pending",
                    path,
                    pages
                );
                return Ok(Paged {
                    items,
                    pages,
                    truncated: true,
                });
            }
            let page_query: &[(&str, String)] = if pages == 0 { query } else { &[] };
            let page: Page<T> = self.get_page(&url, page_query, headers).await?;
            pages += 1;
            next = page.next().map(str::to_string);
            items.extend(page.value);
        }

        Ok(Paged {
            items,
            pages,
            truncated: false,
        })
    }
}
