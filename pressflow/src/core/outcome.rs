//! Per-article publish outcomes.

use serde::{Deserialize, Serialize};

use crate::errors::PublishItemError;

/// Outcome of publishing one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    /// Zero-based position of the article in the run.
    pub index: usize,
    /// Whether the CMS accepted the post.
    pub success: bool,
    /// CMS response body or transport message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl PublishResult {
    /// Records a successful publish.
    #[must_use]
    pub const fn succeeded(index: usize) -> Self {
        Self {
            index,
            success: true,
            error_message: None,
        }
    }

    /// Records a failed publish.
    #[must_use]
    pub fn failed(index: usize, error: &PublishItemError) -> Self {
        Self {
            index,
            success: false,
            error_message: Some(error.message.clone()),
        }
    }

    /// Builds the record from the outcome of one publish call.
    #[must_use]
    pub fn from_outcome(index: usize, outcome: &Result<(), PublishItemError>) -> Self {
        match outcome {
            Ok(()) => Self::succeeded(index),
            Err(e) => Self::failed(index, e),
        }
    }

    /// One-based article number used in operator messages.
    #[must_use]
    pub const fn article_number(&self) -> usize {
        self.index + 1
    }
}
