//! The observable outcome of one run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{GeneratedArticle, PublishResult};

/// Articles generated and per-article publish outcomes of one run.
///
/// `results` covers exactly the articles a publish was attempted for, in
/// article order. A run that was cancelled still produces a report; it then
/// carries the cancellation reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique id of the run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Generated articles, in job order.
    pub articles: Vec<GeneratedArticle>,
    /// Publish outcomes, in article order.
    pub results: Vec<PublishResult>,
    /// Why the run stopped early, if it was cancelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled: Option<String>,
}

impl RunReport {
    /// Number of articles published.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Number of articles whose publish failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    /// Failed results, in article order.
    pub fn failures(&self) -> impl Iterator<Item = &PublishResult> {
        self.results.iter().filter(|r| !r.success)
    }

    /// Whether the run was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled.is_some()
    }

    /// Whether every generated article was published.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cancelled.is_none()
            && self.results.len() == self.articles.len()
            && self.results.iter().all(|r| r.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PublishItemError;

    fn report(results: Vec<PublishResult>) -> RunReport {
        let now = Utc::now();
        RunReport {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            articles: vec![
                GeneratedArticle::new("a", "1"),
                GeneratedArticle::new("b", "2"),
                GeneratedArticle::new("c", "3"),
            ],
            results,
            cancelled: None,
        }
    }

    #[test]
    fn test_counts() {
        let report = report(vec![
            PublishResult::succeeded(0),
            PublishResult::failed(1, &PublishItemError::status(500, "x")),
            PublishResult::succeeded(2),
        ]);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures().map(|r| r.index).collect::<Vec<_>>(), vec![1]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_complete_requires_every_article() {
        let mut partial = report(vec![PublishResult::succeeded(0), PublishResult::succeeded(1)]);
        assert!(!partial.is_complete());
        partial.results.push(PublishResult::succeeded(2));
        assert!(partial.is_complete());
        partial.cancelled = Some("stop".to_string());
        assert!(!partial.is_complete());
    }

    #[test]
    fn test_serializes_without_cancellation_field() {
        let json = serde_json::to_value(report(vec![])).unwrap();
        assert!(json.get("cancelled").is_none());
        assert!(json.get("run_id").is_some());
    }
}
