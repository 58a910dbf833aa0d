//! Ready-made inputs for scenario tests.

use crate::config::{PacingConfig, RunConfig, RunConfigBuilder};
use crate::core::{GeneratedArticle, Tone};

/// A complete configuration: one keyword (`coffee`), two topics
/// (`history`, `health`), tone Informative, category `Blog`, pacing disabled.
#[must_use]
pub fn sample_config() -> RunConfigBuilder {
    RunConfig::builder()
        .keywords(["coffee"])
        .topics(["history", "health"])
        .tone(Tone::Informative)
        .api_key("sk-test")
        .domain("blog.example.com")
        .username("admin")
        .password("secret")
        .category("Blog")
        .pacing(PacingConfig::disabled())
}

/// `n` articles titled `Title {i}` with bodies `Body {i}`.
#[must_use]
pub fn sample_articles(n: usize) -> Vec<GeneratedArticle> {
    (0..n)
        .map(|i| GeneratedArticle::new(format!("Title {i}"), format!("Body {i}")))
        .collect()
}
