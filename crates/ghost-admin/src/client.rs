//! Admin API HTTP client
//!
//! Implements `ContentBackend` over the posts endpoints of the Admin API.
//! Every request is authenticated with a freshly signed admin token.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::backend::{BackendResult, ContentBackend};
use crate::error::BackendError;
use crate::filter::Filter;
use crate::schema::{ContentItem, NotificationDirective, PostDraft, SourceFormat};
use crate::token::AdminKey;

const POSTS_PATH: &str = "/ghost/api/admin/posts/";
const ERROR_BODY_LIMIT: usize = 200;

/// Connection settings for the Admin API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminApiConfig {
    /// Site URL, e.g. `https://blog.example.com`
    pub api_url: String,
    /// Admin key `<id>:<hex secret>`
    pub api_key: String,
    /// Value of the `Accept-Version` header
    pub accept_version: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl AdminApiConfig {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        AdminApiConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            accept_version: "v5.0".to_string(),
            timeout_secs: 30,
        }
    }

    pub fn with_accept_version(mut self, version: &str) -> Self {
        self.accept_version = version.to_string();
        self
    }

    pub fn posts_url(&self) -> String {
        format!("{}{}", self.api_url, POSTS_PATH)
    }

    pub fn post_url(&self, id: &str) -> String {
        format!("{}{}{}/", self.api_url, POSTS_PATH, id)
    }
}

/// `{ "posts": [...] }` request/response body
#[derive(Debug, Serialize, Deserialize)]
struct PostsEnvelope<T> {
    posts: Vec<T>,
}

/// Query parameters carrying a notification directive on edit
pub fn notification_query(notify: Option<&NotificationDirective>) -> Vec<(&'static str, String)> {
    match notify {
        Some(n) => vec![
            ("newsletter", n.newsletter.clone()),
            ("email_segment", n.segment.clone()),
        ],
        None => Vec::new(),
    }
}

/// HTTP client for the posts endpoints
pub struct AdminApiClient {
    config: AdminApiConfig,
    key: AdminKey,
    http_client: reqwest::Client,
}

impl AdminApiClient {
    pub fn new(config: AdminApiConfig) -> Result<Self, BackendError> {
        let key = AdminKey::parse(&config.api_key)?;
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("postcycle/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(AdminApiClient {
            config,
            key,
            http_client,
        })
    }

    fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, BackendError> {
        let token = self.key.sign(Utc::now())?;
        Ok(self
            .http_client
            .request(method, url)
            .header("Authorization", format!("Ghost {token}"))
            .header("Accept-Version", &self.config.accept_version))
    }

    async fn read_posts<T: DeserializeOwned>(response: Response) -> BackendResult<Vec<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }
        let bytes = response.bytes().await?;
        let envelope: PostsEnvelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.posts)
    }

    async fn read_single(response: Response) -> BackendResult<ContentItem> {
        Self::read_posts::<ContentItem>(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Decode("response contained no posts".to_string()))
    }
}

#[async_trait]
impl ContentBackend for AdminApiClient {
    async fn browse(&self, filter: &Filter) -> BackendResult<Vec<ContentItem>> {
        debug!(filter = %filter, "browsing posts");
        let mut query = vec![("limit", "all".to_string())];
        if !filter.is_empty() {
            query.push(("filter", filter.to_string()));
        }
        let response = self
            .request(Method::GET, &self.config.posts_url())?
            .query(&query)
            .send()
            .await?;
        Self::read_posts(response).await
    }

    async fn edit(
        &self,
        item: &ContentItem,
        notify: Option<&NotificationDirective>,
    ) -> BackendResult<ContentItem> {
        debug!(post = %item.id, status = %item.status, "editing post");
        let body = PostsEnvelope {
            posts: vec![item],
        };
        let response = self
            .request(Method::PUT, &self.config.post_url(&item.id))?
            .query(&notification_query(notify))
            .json(&body)
            .send()
            .await?;
        Self::read_single(response).await
    }

    async fn add(&self, draft: &PostDraft, format: SourceFormat) -> BackendResult<ContentItem> {
        debug!(title = %draft.title, "adding post");
        let body = PostsEnvelope {
            posts: vec![draft],
        };
        let response = self
            .request(Method::POST, &self.config.posts_url())?
            .query(&[("source", format.as_str())])
            .json(&body)
            .send()
            .await?;
        Self::read_single(response).await
    }
}
