//! WordPress REST transport.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use crate::config::CmsConfig;
use crate::core::{AuthToken, Category, CategoryId};
use crate::errors::CmsError;
use crate::observability::SpanTimer;

const TOKEN_PATH: &str = "/wp-json/jwt-auth/v1/token";
const CATEGORIES_PATH: &str = "/wp-json/wp/v2/categories";
const POSTS_PATH: &str = "/wp-json/wp/v2/posts";

/// Raw status and body of a CMS response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl CmsResponse {
    /// Creates a response value.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Body of a post-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Always `publish`.
    pub status: &'static str,
    /// Categories the post is filed under.
    pub categories: Vec<CategoryId>,
}

impl NewPost {
    /// Creates an immediately-published post in one category.
    #[must_use]
    pub fn published(
        title: impl Into<String>,
        content: impl Into<String>,
        category: CategoryId,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status: "publish",
            categories: vec![category],
        }
    }
}

/// The three CMS endpoints a run talks to.
///
/// Implementations only move bytes. Status policy belongs to the callers:
/// login wants 200, post creation wants 201.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CmsApi: Send + Sync {
    /// Exchanges credentials for a token.
    async fn request_token(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<CmsResponse, CmsError>;

    /// Lists categories. No authentication.
    async fn list_categories(&self, per_page: usize) -> Result<Vec<Category>, CmsError>;

    /// Creates a post.
    async fn create_post(&self, token: &AuthToken, post: &NewPost)
        -> Result<CmsResponse, CmsError>;
}

/// [`CmsApi`] over HTTP against a WordPress site with the JWT auth plugin.
#[derive(Debug, Clone)]
pub struct WordPressClient {
    client: Client,
    base_url: String,
}

impl WordPressClient {
    /// Creates a client for the configured site.
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| CmsError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    /// Site base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn into_response(response: reqwest::Response) -> Result<CmsResponse, CmsError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(CmsResponse { status, body })
    }
}

#[async_trait]
impl CmsApi for WordPressClient {
    async fn request_token(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<CmsResponse, CmsError> {
        let timer = SpanTimer::start("cms.token");
        let response = self
            .client
            .post(self.url(TOKEN_PATH))
            .form(&[("username", username), ("password", password.expose_secret())])
            .send()
            .await?;

        let response = Self::into_response(response).await?;
        debug!(
            status = response.status,
            duration_ms = timer.elapsed_ms(),
            "Token endpoint answered"
        );
        Ok(response)
    }

    async fn list_categories(&self, per_page: usize) -> Result<Vec<Category>, CmsError> {
        let timer = SpanTimer::start("cms.categories");
        let response = self
            .client
            .get(self.url(CATEGORIES_PATH))
            .query(&[("per_page", per_page)])
            .send()
            .await?;

        let response = Self::into_response(response).await?;
        if !(200..300).contains(&response.status) {
            return Err(CmsError::Status {
                status: response.status,
                body: response.body,
            });
        }

        let categories: Vec<Category> =
            serde_json::from_str(&response.body).map_err(|e| CmsError::Decode(e.to_string()))?;
        debug!(
            count = categories.len(),
            duration_ms = timer.elapsed_ms(),
            "Fetched categories"
        );
        Ok(categories)
    }

    async fn create_post(
        &self,
        token: &AuthToken,
        post: &NewPost,
    ) -> Result<CmsResponse, CmsError> {
        let timer = SpanTimer::start("cms.post");
        let response = self
            .client
            .post(self.url(POSTS_PATH))
            .bearer_auth(token.expose())
            .json(post)
            .send()
            .await?;

        let response = Self::into_response(response).await?;
        debug!(
            status = response.status,
            duration_ms = timer.elapsed_ms(),
            "Post endpoint answered"
        );
        Ok(response)
    }
}
