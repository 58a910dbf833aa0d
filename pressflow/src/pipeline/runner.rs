//! End-to-end run: generate, authenticate, resolve, publish.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::report::RunReport;
use crate::cancellation::CancellationToken;
use crate::cms::{AuthClient, BatchPublisher, CategoryResolver, CmsApi, WordPressClient};
use crate::config::{PacingConfig, RunConfig};
use crate::core::{GeneratedArticle, PublishResult};
use crate::errors::{ConfigError, PipelineError};
use crate::events::{message_data, EventSink, NoOpEventSink};
use crate::generation::{
    CombinationGenerator, CompletionProvider, OpenAiCompletionProvider, TextGenerationClient,
};
use crate::observability::SpanTimer;
use crate::pacing::Pacer;

const LOGIN_SUCCEEDED: &str = "Login was successful, about to post the articles!";
const LOGIN_FAILED: &str =
    "Failed to authenticate with WordPress. Please check your admin username and password.";

/// Runs the stages of a publish run in sequence.
///
/// Exactly one external call is outstanding at any time. The generation
/// pacer is shared by title and article calls and persists across runs of
/// the same pipeline.
pub struct Pipeline {
    provider: Arc<dyn CompletionProvider>,
    cms: Arc<dyn CmsApi>,
    events: Arc<dyn EventSink>,
    cancel: Arc<CancellationToken>,
    generation_pacer: Pacer,
    publish_interval_seconds: f64,
}

impl Pipeline {
    /// Creates a pipeline with default pacing (5 s generation, 2 s publish).
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>, cms: Arc<dyn CmsApi>) -> Self {
        Self {
            provider,
            cms,
            events: Arc::new(NoOpEventSink),
            cancel: Arc::new(CancellationToken::new()),
            generation_pacer: Pacer::from_seconds(
                "completions",
                PacingConfig::default().generation_interval_seconds,
            ),
            publish_interval_seconds: PacingConfig::default().publish_interval_seconds,
        }
    }

    /// Replaces the pacing intervals.
    #[must_use]
    pub fn with_pacing(mut self, pacing: &PacingConfig) -> Self {
        self.generation_pacer = Pacer::from_seconds("completions", pacing.generation_interval_seconds);
        self.publish_interval_seconds = pacing.publish_interval_seconds;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Sets the cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: Arc<CancellationToken>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the cancellation token.
    #[must_use]
    pub fn cancellation(&self) -> Arc<CancellationToken> {
        Arc::clone(&self.cancel)
    }

    /// Runs one end-to-end publish for `config`.
    ///
    /// A fatal stage error aborts the run. Cancellation does not: the
    /// report then holds what was done before the token fired.
    pub async fn run(&self, config: &RunConfig) -> Result<RunReport, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", %run_id, jobs = config.job_count());
        self.run_inner(run_id, config).instrument(span).await
    }

    async fn run_inner(&self, run_id: Uuid, config: &RunConfig) -> Result<RunReport, PipelineError> {
        let started_at = Utc::now();
        let timer = SpanTimer::start("run");

        let articles = match self.generate(config).await {
            Ok(articles) => articles,
            Err(err) => {
                error!(error = %err, "Generation failed");
                self.emit("generation.failed", err.to_string(), json!({})).await;
                return Err(err);
            }
        };

        let results = if self.cancel.is_cancelled() {
            Vec::new()
        } else {
            self.publish(config, &articles).await?
        };

        let stopped_early =
            articles.len() < config.job_count() || results.len() < articles.len();
        let cancelled = self.cancel.reason().filter(|_| stopped_early);
        if let Some(reason) = &cancelled {
            info!(reason = %reason, generated = articles.len(), attempted = results.len(), "Run cancelled");
            self.emit(
                "run.cancelled",
                format!("Run cancelled: {reason}"),
                json!({"generated": articles.len(), "attempted": results.len()}),
            )
            .await;
        }

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            articles,
            results,
            cancelled,
        };

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            duration_ms = timer.finish(),
            "Run completed"
        );
        self.emit(
            "run.completed",
            format!(
                "Published {} of {} articles",
                report.succeeded(),
                report.articles.len()
            ),
            json!({
                "run_id": run_id.to_string(),
                "succeeded": report.succeeded(),
                "failed": report.failed(),
            }),
        )
        .await;

        Ok(report)
    }

    async fn generate(&self, config: &RunConfig) -> Result<Vec<GeneratedArticle>, PipelineError> {
        let client = TextGenerationClient::with_config(Arc::clone(&self.provider), config.generation());
        let jobs = CombinationGenerator::new(config.keywords(), config.topics());
        let total = jobs.len();
        let mut articles = Vec::with_capacity(total);

        self.emit(
            "generation.started",
            format!("Generating {total} articles"),
            json!({"total": total}),
        )
        .await;

        for (index, job) in jobs.into_iter().enumerate() {
            let number = index + 1;

            if !self.generation_pacer.ready(&self.cancel).await {
                break;
            }
            let title = client.generate_title(job.keyword(), job.topic()).await;
            self.generation_pacer.mark();
            let title = title?;
            info!(index, keyword = %job.keyword(), topic = %job.topic(), "Title generated");
            self.emit(
                "generation.title",
                format!("Generated title {number} of {total}: {title}"),
                json!({"index": index, "keyword": job.keyword().as_str(), "topic": job.topic().as_str()}),
            )
            .await;

            if !self.generation_pacer.ready(&self.cancel).await {
                break;
            }
            let body = client.generate_article(&title, config.tone()).await;
            self.generation_pacer.mark();
            let body = body?;
            info!(index, chars = body.len(), "Article generated");
            self.emit(
                "generation.article",
                format!("Generated article {number} of {total}"),
                json!({"index": index}),
            )
            .await;

            articles.push(GeneratedArticle::new(title, body));
        }

        Ok(articles)
    }

    async fn publish(
        &self,
        config: &RunConfig,
        articles: &[GeneratedArticle],
    ) -> Result<Vec<PublishResult>, PipelineError> {
        let token = match AuthClient::new(Arc::clone(&self.cms))
            .login(config.cms_credentials())
            .await
        {
            Ok(token) => token,
            Err(err) => {
                error!(error = %err, "Authentication failed");
                self.emit("auth.failed", LOGIN_FAILED, json!({"detail": err.to_string()}))
                    .await;
                return Err(err.into());
            }
        };
        self.emit("auth.succeeded", LOGIN_SUCCEEDED, json!({})).await;

        let resolver = CategoryResolver::new(Arc::clone(&self.cms), config.cms().categories_per_page);
        let category = match resolver.resolve(config.category_name()).await {
            Ok(id) => id,
            Err(err) => {
                error!(error = %err, "Category resolution failed");
                self.emit("category.failed", err.to_string(), json!({})).await;
                return Err(err.into());
            }
        };
        self.emit(
            "category.resolved",
            format!("Using category {} (id {category})", config.category_name()),
            json!({"category_id": category.0}),
        )
        .await;

        let publisher = BatchPublisher::new(Arc::clone(&self.cms), config.publish().chunk_size)
            .with_pacer(Pacer::from_seconds("cms.posts", self.publish_interval_seconds))
            .with_events(Arc::clone(&self.events))
            .with_cancellation(Arc::clone(&self.cancel));

        Ok(publisher.publish(articles, &token, category).await)
    }

    async fn emit(&self, event_type: &str, message: impl Into<String>, extra: serde_json::Value) {
        self.events
            .emit(event_type, Some(message_data(message, extra)))
            .await;
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("generation_pacer", &self.generation_pacer)
            .field("publish_interval_seconds", &self.publish_interval_seconds)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Runs one publish against the real services named in `config`.
pub async fn run_pipeline(
    config: &RunConfig,
    events: Arc<dyn EventSink>,
    cancel: Arc<CancellationToken>,
) -> Result<RunReport, PipelineError> {
    let provider =
        OpenAiCompletionProvider::new(config.generation(), config.generation_credentials())?;
    let cms = WordPressClient::new(config.cms())
        .map_err(|e| ConfigError::invalid("cms", e.to_string()))?;

    Pipeline::new(Arc::new(provider), Arc::new(cms))
        .with_pacing(config.pacing())
        .with_events(events)
        .with_cancellation(cancel)
        .run(config)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{GenerationError, GenerationErrorKind};
    use crate::events::CollectingEventSink;
    use crate::generation::CompletionRequest;
    use crate::testing::{sample_config, InMemoryCms, ScriptedCompletionProvider};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn provider() -> Arc<ScriptedCompletionProvider> {
        Arc::new(ScriptedCompletionProvider::new().with_replies([
            "\"Coffee Through the Ages\"",
            "Long ago, coffee...",
            "  Coffee and Your Heart ",
            "Research says...",
        ]))
    }

    fn blog() -> Arc<InMemoryCms> {
        Arc::new(InMemoryCms::new().with_category(1, "News").with_category(7, "Blog"))
    }

    #[tokio::test]
    async fn test_end_to_end_coffee() {
        let provider = provider();
        let cms = blog();
        let sink = Arc::new(CollectingEventSink::new());
        let config = sample_config().build().unwrap();

        let report = Pipeline::new(provider.clone(), cms.clone())
            .with_pacing(config.pacing())
            .with_events(sink.clone())
            .run(&config)
            .await
            .unwrap();

        assert_eq!(
            report.articles,
            vec![
                GeneratedArticle::new("Coffee Through the Ages", "Long ago, coffee..."),
                GeneratedArticle::new("Coffee and Your Heart", "Research says..."),
            ]
        );
        assert_eq!(report.results.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(report.succeeded(), 2);
        assert!(report.cancelled.is_none());

        let prompts: Vec<String> = provider.requests().into_iter().map(|r| r.prompt).collect();
        assert!(prompts[0].contains("about coffee and history"));
        assert!(prompts[1].starts_with("Write a Informative blog article with the title: Coffee Through the Ages"));
        assert!(prompts[2].contains("about coffee and health"));

        let posts = cms.posts();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.categories == vec![crate::core::CategoryId(7)]));
        assert_eq!(cms.tokens_seen(), vec!["test-token".to_string(); 2]);

        let messages = sink.messages();
        assert!(messages.contains(&LOGIN_SUCCEEDED.to_string()));
        assert!(messages.contains(&"Article 2 published successfully!".to_string()));
        assert_eq!(sink.events_of_type("publish.batch_started").len(), 1);
        assert_eq!(sink.events_of_type("run.completed").len(), 1);
    }

    #[tokio::test]
    async fn test_auth_failure_never_posts() {
        let cms = Arc::new(
            InMemoryCms::new()
                .with_category(7, "Blog")
                .rejecting_login(403, "{\"code\":\"invalid\"}"),
        );
        let sink = Arc::new(CollectingEventSink::new());
        let config = sample_config().build().unwrap();
        let err = Pipeline::new(provider(), cms.clone())
            .with_pacing(config.pacing())
            .with_events(sink.clone())
            .run(&config)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Auth(_)));
        assert_eq!(cms.token_requests(), 1);
        assert_eq!(cms.category_requests(), 0);
        assert_eq!(cms.post_count(), 0);
        assert_eq!(sink.events_of_type("auth.failed").len(), 1);
        assert!(sink.messages().contains(&LOGIN_FAILED.to_string()));
    }

    #[tokio::test]
    async fn test_unknown_category_never_posts() {
        let cms = Arc::new(InMemoryCms::new().with_category(1, "News"));
        let config = sample_config().build().unwrap();
        let err = Pipeline::new(provider(), cms.clone())
            .with_pacing(config.pacing())
            .run(&config)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to find category ID for category: Blog");
        assert_eq!(cms.post_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_aborts_before_cms() {
        let provider = Arc::new(
            ScriptedCompletionProvider::new()
                .failing_at(2, GenerationError::new(GenerationErrorKind::Timeout, "slow")),
        );
        let cms = blog();
        let sink = Arc::new(CollectingEventSink::new());
        let config = sample_config().build().unwrap();

        let err = Pipeline::new(provider.clone(), cms.clone())
            .with_pacing(config.pacing())
            .with_events(sink.clone())
            .run(&config)
            .await
            .unwrap_err();

        assert_eq!(err.stage(), "generation");
        assert_eq!(provider.call_count(), 3);
        assert_eq!(cms.token_requests(), 0);
        assert_eq!(cms.post_count(), 0);
        assert_eq!(sink.events_of_type("generation.failed").len(), 1);
    }

    #[tokio::test]
    async fn test_partial_publish_failure_is_reported() {
        let cms = Arc::new(
            InMemoryCms::new()
                .with_category(7, "Blog")
                .failing_post(0, 500, "Internal Server Error"),
        );
        let sink = Arc::new(CollectingEventSink::new());
        let config = sample_config().build().unwrap();

        let report = Pipeline::new(provider(), cms.clone())
            .with_pacing(config.pacing())
            .with_events(sink.clone())
            .run(&config)
            .await
            .unwrap();

        assert_eq!(cms.post_count(), 2);
        assert!(!report.results[0].success);
        assert!(report.results[1].success);
        assert!(sink
            .messages()
            .contains(&"Failed to publish Article 1. Error: Internal Server Error".to_string()));
    }

    #[tokio::test]
    async fn test_dropped_post_is_recorded_and_run_continues() {
        let cms = Arc::new(
            InMemoryCms::new()
                .with_category(7, "Blog")
                .dropping_post(1, "connection reset"),
        );
        let sink = Arc::new(CollectingEventSink::new());
        let config = sample_config().build().unwrap();

        let report = Pipeline::new(provider(), cms.clone())
            .with_pacing(config.pacing())
            .with_events(sink.clone())
            .run(&config)
            .await
            .unwrap();

        assert_eq!(cms.post_count(), 2);
        assert!(report.results[0].success);
        assert!(!report.results[1].success);
        assert!(report.results[1]
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("connection reset")));
        assert_eq!(report.failed(), 1);
        assert_eq!(sink.events_of_type("publish.article_failed").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_calls_are_paced() {
        let config = sample_config().pacing(PacingConfig::default()).build().unwrap();
        let start = tokio::time::Instant::now();

        Pipeline::new(provider(), blog())
            .with_pacing(config.pacing())
            .run(&config)
            .await
            .unwrap();

        // 4 completions spaced 5 s apart, then 2 posts spaced 2 s apart.
        assert_eq!(start.elapsed(), Duration::from_secs(3 * 5 + 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_generation_skips_cms() {
        let cancel = Arc::new(CancellationToken::new());
        let trigger = Arc::clone(&cancel);
        let cms = blog();
        let config = sample_config().pacing(PacingConfig::default()).build().unwrap();

        let pipeline = Pipeline::new(provider(), cms.clone())
            .with_pacing(config.pacing())
            .with_cancellation(cancel);

        let (report, ()) = tokio::join!(pipeline.run(&config), async move {
            tokio::time::sleep(Duration::from_secs(7)).await;
            trigger.cancel("operator abort");
        });
        let report = report.unwrap();

        assert_eq!(report.cancelled.as_deref(), Some("operator abort"));
        assert_eq!(report.articles.len(), 1);
        assert!(report.results.is_empty());
        assert_eq!(cms.token_requests(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_publish_reports_attempted_only() {
        let cancel = Arc::new(CancellationToken::new());
        let trigger = Arc::clone(&cancel);
        let cms = blog();
        let config = sample_config()
            .topics(["history", "health", "culture"])
            .pacing(PacingConfig {
                generation_interval_seconds: 0.0,
                publish_interval_seconds: 2.0,
            })
            .build()
            .unwrap();

        let pipeline = Pipeline::new(Arc::new(ScriptedCompletionProvider::new()), cms.clone())
            .with_pacing(config.pacing())
            .with_cancellation(cancel);

        let (report, ()) = tokio::join!(pipeline.run(&config), async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            trigger.cancel("operator abort");
        });
        let report = report.unwrap();

        assert_eq!(report.articles.len(), 3);
        assert_eq!(report.results.len(), 2);
        assert_eq!(cms.post_count(), 2);
        assert!(report.is_cancelled());
    }

    /// Cancels the token once `after` events of `event_type` were seen.
    struct CancelAfter {
        cancel: Arc<CancellationToken>,
        event_type: &'static str,
        after: usize,
        seen: parking_lot::Mutex<usize>,
    }

    #[async_trait::async_trait]
    impl EventSink for CancelAfter {
        async fn emit(&self, event_type: &str, _data: Option<serde_json::Value>) {
            if event_type != self.event_type {
                return;
            }
            let mut seen = self.seen.lock();
            *seen += 1;
            if *seen == self.after {
                self.cancel.cancel("operator abort");
            }
        }
    }

    #[tokio::test]
    async fn test_cancel_after_last_post_leaves_run_complete() {
        let cancel = Arc::new(CancellationToken::new());
        let sink = Arc::new(CancelAfter {
            cancel: Arc::clone(&cancel),
            event_type: "publish.article_succeeded",
            after: 2,
            seen: parking_lot::Mutex::new(0),
        });
        let config = sample_config().build().unwrap();

        let report = Pipeline::new(provider(), blog())
            .with_pacing(config.pacing())
            .with_events(sink)
            .with_cancellation(Arc::clone(&cancel))
            .run(&config)
            .await
            .unwrap();

        assert!(cancel.is_cancelled());
        assert_eq!(report.succeeded(), 2);
        assert!(report.cancelled.is_none());
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_title_requests_use_title_cap() {
        let provider = provider();
        let config = sample_config().build().unwrap();
        Pipeline::new(provider.clone(), blog())
            .with_pacing(config.pacing())
            .run(&config)
            .await
            .unwrap();

        let caps: Vec<u32> = provider
            .requests()
            .iter()
            .map(|r: &CompletionRequest| r.max_tokens)
            .collect();
        assert_eq!(caps, vec![50, 1000, 50, 1000]);
    }
}
