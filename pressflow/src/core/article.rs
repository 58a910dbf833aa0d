//! Generation jobs and generated articles.

use serde::{Deserialize, Serialize};

use super::input::{Keyword, Topic};

/// One (keyword, topic) pairing slated for article generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationJob {
    keyword: Keyword,
    topic: Topic,
}

impl GenerationJob {
    /// Creates a new job.
    #[must_use]
    pub const fn new(keyword: Keyword, topic: Topic) -> Self {
        Self { keyword, topic }
    }

    /// Returns the keyword.
    #[must_use]
    pub const fn keyword(&self) -> &Keyword {
        &self.keyword
    }

    /// Returns the topic.
    #[must_use]
    pub const fn topic(&self) -> &Topic {
        &self.topic
    }
}

/// A generated article, ready to publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArticle {
    title: String,
    body: String,
}

impl GeneratedArticle {
    /// Creates a new article.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the article body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}
