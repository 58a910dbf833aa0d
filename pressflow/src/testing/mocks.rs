//! In-memory fakes for the two external services.

use async_trait::async_trait;
use parking_lot::Mutex;
use secrecy::SecretString;
use std::collections::{HashMap, VecDeque};

use crate::cms::{CmsApi, CmsResponse, NewPost};
use crate::core::{AuthToken, Category};
use crate::errors::{CmsError, GenerationError};
use crate::generation::{CompletionProvider, CompletionRequest};

/// A completion provider that replays scripted replies and records requests.
///
/// Once the script runs out it answers `Completion {n}`, where `n` is the
/// one-based call number.
#[derive(Debug, Default)]
pub struct ScriptedCompletionProvider {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    failures: Mutex<HashMap<usize, GenerationError>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletionProvider {
    /// Creates a provider with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply.
    #[must_use]
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(text.into()));
        self
    }

    /// Queues several replies.
    #[must_use]
    pub fn with_replies<I, S>(self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replies
            .lock()
            .extend(texts.into_iter().map(|t| Ok(t.into())));
        self
    }

    /// Makes the zero-based `call` fail with `error`.
    #[must_use]
    pub fn failing_at(self, call: usize, error: GenerationError) -> Self {
        self.failures.lock().insert(call, error);
        self
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Number of calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let call = {
            let mut requests = self.requests.lock();
            requests.push(request.clone());
            requests.len() - 1
        };

        if let Some(error) = self.failures.lock().remove(&call) {
            return Err(error);
        }

        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("Completion {}", call + 1)))
    }
}

/// A WordPress stand-in holding categories and recording posts.
///
/// Logs in anyone with token `test-token` and accepts every post with 201
/// unless told otherwise.
#[derive(Debug)]
pub struct InMemoryCms {
    categories: Vec<Category>,
    token_response: CmsResponse,
    post_failures: Mutex<HashMap<usize, Result<CmsResponse, CmsError>>>,
    posts: Mutex<Vec<NewPost>>,
    tokens_seen: Mutex<Vec<String>>,
    token_requests: Mutex<usize>,
    category_requests: Mutex<usize>,
}

impl Default for InMemoryCms {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            token_response: CmsResponse::new(200, r#"{"token":"test-token"}"#),
            post_failures: Mutex::new(HashMap::new()),
            posts: Mutex::new(Vec::new()),
            tokens_seen: Mutex::new(Vec::new()),
            token_requests: Mutex::new(0),
            category_requests: Mutex::new(0),
        }
    }
}

impl InMemoryCms {
    /// Creates a site with no categories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category.
    #[must_use]
    pub fn with_category(mut self, id: u64, name: impl Into<String>) -> Self {
        self.categories.push(Category::new(id, name));
        self
    }

    /// Makes every login answer with `status` and `body`.
    #[must_use]
    pub fn rejecting_login(mut self, status: u16, body: impl Into<String>) -> Self {
        self.token_response = CmsResponse::new(status, body);
        self
    }

    /// Makes the zero-based `post` answer with `status` and `body`.
    #[must_use]
    pub fn failing_post(self, post: usize, status: u16, body: impl Into<String>) -> Self {
        self.post_failures
            .lock()
            .insert(post, Ok(CmsResponse::new(status, body)));
        self
    }

    /// Makes the zero-based `post` fail without a response.
    #[must_use]
    pub fn dropping_post(self, post: usize, message: impl Into<String>) -> Self {
        self.post_failures
            .lock()
            .insert(post, Err(CmsError::Transport(message.into())));
        self
    }

    /// Posts received, including rejected ones.
    #[must_use]
    pub fn posts(&self) -> Vec<NewPost> {
        self.posts.lock().clone()
    }

    /// Number of post calls received.
    #[must_use]
    pub fn post_count(&self) -> usize {
        self.posts.lock().len()
    }

    /// Bearer tokens presented with each post.
    #[must_use]
    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().clone()
    }

    /// Number of login calls received.
    #[must_use]
    pub fn token_requests(&self) -> usize {
        *self.token_requests.lock()
    }

    /// Number of category listings served.
    #[must_use]
    pub fn category_requests(&self) -> usize {
        *self.category_requests.lock()
    }
}

#[async_trait]
impl CmsApi for InMemoryCms {
    async fn request_token(
        &self,
        _username: &str,
        _password: &SecretString,
    ) -> Result<CmsResponse, CmsError> {
        *self.token_requests.lock() += 1;
        Ok(self.token_response.clone())
    }

    async fn list_categories(&self, per_page: usize) -> Result<Vec<Category>, CmsError> {
        *self.category_requests.lock() += 1;
        Ok(self.categories.iter().take(per_page).cloned().collect())
    }

    async fn create_post(
        &self,
        token: &AuthToken,
        post: &NewPost,
    ) -> Result<CmsResponse, CmsError> {
        let call = {
            let mut posts = self.posts.lock();
            posts.push(post.clone());
            posts.len() - 1
        };
        self.tokens_seen.lock().push(token.expose().to_string());

        match self.post_failures.lock().remove(&call) {
            Some(outcome) => outcome,
            None => Ok(CmsResponse::new(201, format!(r#"{{"id":{}}}"#, call + 1))),
        }
    }
}
