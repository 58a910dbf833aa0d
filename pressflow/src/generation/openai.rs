//! OpenAI-compatible completions endpoint.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::provider::{CompletionProvider, CompletionRequest};
use crate::config::{GenerationConfig, GenerationCredentials};
use crate::errors::{GenerationError, GenerationErrorKind};
use crate::observability::SpanTimer;

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    #[serde(flatten)]
    request: &'a CompletionRequest,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    text: String,
}

/// Calls `POST {base_url}/completions` with a bearer API key.
pub struct OpenAiCompletionProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiCompletionProvider {
    /// Creates a provider from the run's generation settings.
    pub fn new(
        config: &GenerationConfig,
        credentials: &GenerationCredentials,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Config, e.to_string()))?;

        Ok(Self {
            client,
            api_key: SecretString::from(credentials.api_key().to_string()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/completions", self.base_url)
    }
}

impl fmt::Debug for OpenAiCompletionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompletionProvider")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let timer = SpanTimer::start("completion");
        let body = CompletionBody {
            model: &self.model,
            request,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::new(GenerationErrorKind::Api, text)
                .with_status(status.as_u16()));
        }

        let parsed: CompletionResponse = response.json().await?;
        debug!(
            model = %self.model,
            max_tokens = request.max_tokens,
            duration_ms = timer.elapsed_ms(),
            "Completion received"
        );

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| {
                GenerationError::new(
                    GenerationErrorKind::EmptyResponse,
                    "completion response contained no choices",
                )
            })
    }
}
