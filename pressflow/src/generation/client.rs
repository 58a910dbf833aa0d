//! Title and article generation on top of a completion provider.

use std::sync::Arc;
use tracing::debug;

use super::provider::{CompletionProvider, CompletionRequest};
use crate::config::GenerationConfig;
use crate::core::{Keyword, Tone, Topic};
use crate::errors::GenerationError;

/// Builds the title prompt for a job.
#[must_use]
pub fn title_prompt(keyword: &Keyword, topic: &Topic) -> String {
    format!(
        "Generate a title for a blog article about {} and {}. Keep the title within 50 tokens.",
        keyword.as_str().trim(),
        topic.as_str().trim()
    )
}

/// Builds the article prompt for a title.
#[must_use]
pub fn article_prompt(title: &str, tone: Tone) -> String {
    format!("Write a {tone} blog article with the title: {title}\n\n")
}

/// Removes every double-quote character, trimming whitespace both before and
/// after, so `" \"  Title  \" "` becomes `Title`.
///
/// Idempotent: clean input comes back unchanged.
#[must_use]
pub fn clean_title(raw: &str) -> String {
    raw.trim().replace('"', "").trim().to_string()
}

/// Generates titles and article bodies.
///
/// Both calls are single requests with no retry; a failure is fatal to the run.
/// Pacing between calls is the caller's job.
#[derive(Clone)]
pub struct TextGenerationClient {
    provider: Arc<dyn CompletionProvider>,
    title_max_tokens: u32,
    article_max_tokens: u32,
    temperature: f32,
}

impl TextGenerationClient {
    /// Creates a client with default caps (50 / 1000 tokens) and temperature 0.7.
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self::with_config(provider, &GenerationConfig::default())
    }

    /// Creates a client using the caps and temperature from `config`.
    #[must_use]
    pub fn with_config(provider: Arc<dyn CompletionProvider>, config: &GenerationConfig) -> Self {
        Self {
            provider,
            title_max_tokens: config.title_max_tokens,
            article_max_tokens: config.article_max_tokens,
            temperature: config.temperature,
        }
    }

    /// Generates a cleaned title for a keyword/topic pair.
    pub async fn generate_title(
        &self,
        keyword: &Keyword,
        topic: &Topic,
    ) -> Result<String, GenerationError> {
        let request = CompletionRequest::new(
            title_prompt(keyword, topic),
            self.title_max_tokens,
            self.temperature,
        )
        .deterministic_sampling();

        let raw = self.provider.complete(&request).await?;
        let title = clean_title(&raw);
        debug!(keyword = %keyword, topic = %topic, title = %title, "Generated title");
        Ok(title)
    }

    /// Generates an article body for a title.
    pub async fn generate_article(&self, title: &str, tone: Tone) -> Result<String, GenerationError> {
        let request = CompletionRequest::new(
            article_prompt(title, tone),
            self.article_max_tokens,
            self.temperature,
        );

        let raw = self.provider.complete(&request).await?;
        let body = raw.trim().to_string();
        debug!(title = %title, tone = %tone, chars = body.len(), "Generated article");
        Ok(body)
    }
}

impl std::fmt::Debug for TextGenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextGenerationClient")
            .field("title_max_tokens", &self.title_max_tokens)
            .field("article_max_tokens", &self.article_max_tokens)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GenerationErrorKind;
    use crate::generation::MockCompletionProvider;
    use mockall::predicate::function;

    fn keyword(raw: &str) -> Keyword {
        Keyword::parse(raw).unwrap()
    }

    fn topic(raw: &str) -> Topic {
        Topic::parse(raw).unwrap()
    }

    #[test]
    fn test_title_prompt() {
        assert_eq!(
            title_prompt(&keyword(" coffee "), &topic("history")),
            "Generate a title for a blog article about coffee and history. Keep the title within 50 tokens."
        );
    }

    #[test]
    fn test_article_prompt() {
        assert_eq!(
            article_prompt("A Brief History of Coffee", Tone::Informative),
            "Write a Informative blog article with the title: A Brief History of Coffee\n\n"
        );
    }

    #[test]
    fn test_clean_title_strips_quotes_and_whitespace() {
        assert_eq!(clean_title("\n\n\"The Bean That Built Empires\"  "), "The Bean That Built Empires");
        assert_eq!(clean_title("Say \"Hi\" to Tea"), "Say Hi to Tea");
        assert_eq!(clean_title("\"  Padded Inside  \""), "Padded Inside");
    }

    #[test]
    fn test_clean_title_idempotent_on_clean_input() {
        let clean = "Coffee and Health: What the Research Says";
        assert_eq!(clean_title(clean), clean);
        assert_eq!(clean_title(&clean_title("  \"x\"  ")), clean_title("  \"x\"  "));
    }

    #[tokio::test]
    async fn test_generate_title_request_shape() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .with(function(|req: &CompletionRequest| {
                req.max_tokens == 50
                    && (req.temperature - 0.7).abs() < f32::EPSILON
                    && req.top_p == Some(1.0)
                    && req.frequency_penalty == Some(0.0)
                    && req.presence_penalty == Some(0.0)
                    && req.n == 1
                    && req.stop.is_none()
                    && req.prompt.contains("about coffee and history")
            }))
            .times(1)
            .returning(|_| Ok("\n\"Coffee Through the Ages\"".to_string()));

        let client = TextGenerationClient::new(Arc::new(provider));
        let title = client
            .generate_title(&keyword("coffee"), &topic("history"))
            .await
            .unwrap();
        assert_eq!(title, "Coffee Through the Ages");
    }

    #[tokio::test]
    async fn test_generate_article_request_shape() {
        let mut provider = MockCompletionProvider::new();
        provider
            .expect_complete()
            .with(function(|req: &CompletionRequest| {
                req.max_tokens == 1000
                    && req.top_p.is_none()
                    && req.prompt.starts_with("Write a Serious blog article with the title: T")
            }))
            .times(1)
            .returning(|_| Ok("  Body text.\n".to_string()));

        let client = TextGenerationClient::new(Arc::new(provider));
        let body = client.generate_article("T", Tone::Serious).await.unwrap();
        assert_eq!(body, "Body text.");
    }

    #[tokio::test]
    async fn test_generation_error_propagates() {
        let mut provider = MockCompletionProvider::new();
        provider.expect_complete().returning(|_| {
            Err(GenerationError::new(GenerationErrorKind::Timeout, "deadline exceeded"))
        });

        let client = TextGenerationClient::new(Arc::new(provider));
        let err = client
            .generate_title(&keyword("coffee"), &topic("history"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::Timeout);
    }
}
