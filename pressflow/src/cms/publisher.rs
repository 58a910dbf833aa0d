//! Chunked, paced publishing with per-article outcomes.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::client::{CmsApi, NewPost};
use crate::cancellation::CancellationToken;
use crate::core::{AuthToken, CategoryId, GeneratedArticle, PublishResult};
use crate::errors::PublishItemError;
use crate::events::{message_data, EventSink, NoOpEventSink};
use crate::pacing::Pacer;

/// Default number of articles per batch.
pub const DEFAULT_CHUNK_SIZE: usize = 30;

/// Default spacing between post creations.
pub const DEFAULT_PUBLISH_INTERVAL: Duration = Duration::from_secs(2);

/// Splits articles into order-preserving chunks of at most `chunk_size`.
///
/// A `chunk_size` of zero is treated as one.
pub fn chunk_articles(
    articles: &[GeneratedArticle],
    chunk_size: usize,
) -> std::slice::Chunks<'_, GeneratedArticle> {
    articles.chunks(chunk_size.max(1))
}

/// Number of chunks [`chunk_articles`] yields for `len` articles.
#[must_use]
pub const fn chunk_count(len: usize, chunk_size: usize) -> usize {
    let size = if chunk_size == 0 { 1 } else { chunk_size };
    len.div_ceil(size)
}

/// Publishes articles one by one, recording a result for each.
///
/// A failed post never stops the batch. Cancellation stops before the next
/// post; the results then cover exactly the articles attempted.
pub struct BatchPublisher {
    api: Arc<dyn CmsApi>,
    chunk_size: usize,
    pacer: Pacer,
    events: Arc<dyn EventSink>,
    cancel: Arc<CancellationToken>,
}

impl BatchPublisher {
    /// Creates a publisher with the default 2 second pacing.
    #[must_use]
    pub fn new(api: Arc<dyn CmsApi>, chunk_size: usize) -> Self {
        Self {
            api,
            chunk_size: chunk_size.max(1),
            pacer: Pacer::new("cms.posts", DEFAULT_PUBLISH_INTERVAL),
            events: Arc::new(NoOpEventSink),
            cancel: Arc::new(CancellationToken::new()),
        }
    }

    /// Replaces the pacer.
    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
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

    /// Articles per batch.
    #[must_use]
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Publishes every article and returns one result per attempted article,
    /// in article order.
    pub async fn publish(
        &self,
        articles: &[GeneratedArticle],
        token: &AuthToken,
        category: CategoryId,
    ) -> Vec<PublishResult> {
        let total_chunks = chunk_count(articles.len(), self.chunk_size);
        let mut results = Vec::with_capacity(articles.len());

        for (chunk_index, chunk) in chunk_articles(articles, self.chunk_size).enumerate() {
            if self.cancel.is_cancelled() {
                break;
            }

            let first = chunk_index * self.chunk_size;
            info!(
                batch = chunk_index + 1,
                total_batches = total_chunks,
                size = chunk.len(),
                "Starting publish batch"
            );
            self.events
                .emit(
                    "publish.batch_started",
                    Some(message_data(
                        format!(
                            "Publishing batch {} of {} ({} articles)",
                            chunk_index + 1,
                            total_chunks,
                            chunk.len()
                        ),
                        json!({"batch": chunk_index, "first_index": first, "size": chunk.len()}),
                    )),
                )
                .await;

            for (offset, article) in chunk.iter().enumerate() {
                if !self.pacer.ready(&self.cancel).await {
                    debug!(index = first + offset, "Publish cancelled before post");
                    return results;
                }

                let index = first + offset;
                let outcome = self.publish_one(article, token, category).await;
                self.pacer.mark();

                let result = PublishResult::from_outcome(index, &outcome);
                self.report(&result, outcome.err().as_ref()).await;
                results.push(result);
            }
        }

        results
    }

    async fn publish_one(
        &self,
        article: &GeneratedArticle,
        token: &AuthToken,
        category: CategoryId,
    ) -> Result<(), PublishItemError> {
        let post = NewPost::published(article.title(), article.body(), category);
        let response = self.api.create_post(token, &post).await?;
        if response.status == 201 {
            Ok(())
        } else {
            Err(PublishItemError::status(response.status, response.body))
        }
    }

    async fn report(&self, result: &PublishResult, error: Option<&PublishItemError>) {
        let number = result.article_number();
        match error {
            None => {
                info!(index = result.index, "Article published");
                self.events
                    .emit(
                        "publish.article_succeeded",
                        Some(message_data(
                            format!("Article {number} published successfully!"),
                            json!({"index": result.index}),
                        )),
                    )
                    .await;
            }
            Some(err) => {
                warn!(index = result.index, status = ?err.status, error = %err, "Article publish failed");
                self.events
                    .emit(
                        "publish.article_failed",
                        Some(message_data(
                            format!("Failed to publish Article {number}. Error: {}", err.message),
                            json!({"index": result.index, "status": err.status}),
                        )),
                    )
                    .await;
            }
        }
    }
}

impl std::fmt::Debug for BatchPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchPublisher")
            .field("chunk_size", &self.chunk_size)
            .field("pacer", &self.pacer)
            .finish_non_exhaustive()
    }
}
