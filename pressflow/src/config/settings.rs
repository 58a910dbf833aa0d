//! Tunable settings for the external services and the publish loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ConfigError;

/// Settings for the text-generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_generation_base_url")]
    pub base_url: String,
    /// Completion model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_generation_timeout")]
    pub timeout_seconds: f64,
    /// Token cap for titles.
    #[serde(default = "default_title_max_tokens")]
    pub title_max_tokens: u32,
    /// Token cap for article bodies.
    #[serde(default = "default_article_max_tokens")]
    pub article_max_tokens: u32,
    /// Sampling temperature for both calls.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_generation_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}

const fn default_generation_timeout() -> f64 {
    60.0
}

const fn default_title_max_tokens() -> u32 {
    50
}

const fn default_article_max_tokens() -> u32 {
    1000
}

const fn default_temperature() -> f32 {
    0.7
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_generation_base_url(),
            model: default_model(),
            timeout_seconds: default_generation_timeout(),
            title_max_tokens: default_title_max_tokens(),
            article_max_tokens: default_article_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl GenerationConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Gets timeout as Duration. Unrepresentable values fall back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_generation_timeout()))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        positive_seconds("generation.timeout_seconds", self.timeout_seconds).map(|_| ())
    }
}

/// Settings for the WordPress REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmsConfig {
    /// Site domain (`blog.example.com`) or full base URL (`http://localhost:8080`).
    #[serde(default)]
    pub domain: String,
    /// Accept self-signed certificates on the operator's own site.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
    /// Request timeout in seconds.
    #[serde(default = "default_cms_timeout")]
    pub timeout_seconds: f64,
    /// Page size for the category listing.
    #[serde(default = "default_categories_per_page")]
    pub categories_per_page: usize,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_accept_invalid_certs() -> bool {
    true
}

const fn default_cms_timeout() -> f64 {
    30.0
}

const fn default_categories_per_page() -> usize {
    100
}

fn default_user_agent() -> String {
    concat!("pressflow/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            accept_invalid_certs: default_accept_invalid_certs(),
            timeout_seconds: default_cms_timeout(),
            categories_per_page: default_categories_per_page(),
            user_agent: default_user_agent(),
        }
    }
}

impl CmsConfig {
    /// Creates a configuration for a domain with defaults.
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// Returns the site base URL without a trailing slash.
    ///
    /// A bare host gets `https://`; a value with a scheme is kept as-is.
    #[must_use]
    pub fn base_url(&self) -> String {
        let domain = self.domain.trim().trim_end_matches('/');
        if domain.contains("://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }

    /// Gets timeout as Duration. Unrepresentable values fall back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_cms_timeout()))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        positive_seconds("cms.timeout_seconds", self.timeout_seconds).map(|_| ())
    }
}

/// Minimum spacing between calls to each rate-limited endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Seconds between completion calls.
    #[serde(default = "default_generation_interval")]
    pub generation_interval_seconds: f64,
    /// Seconds between post creations.
    #[serde(default = "default_publish_interval")]
    pub publish_interval_seconds: f64,
}

const fn default_generation_interval() -> f64 {
    5.0
}

const fn default_publish_interval() -> f64 {
    2.0
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            generation_interval_seconds: default_generation_interval(),
            publish_interval_seconds: default_publish_interval(),
        }
    }
}

impl PacingConfig {
    /// No pacing at all. Only for tests against local fakes.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            generation_interval_seconds: 0.0,
            publish_interval_seconds: 0.0,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        seconds(
            "pacing.generation_interval_seconds",
            self.generation_interval_seconds,
        )?;
        seconds("pacing.publish_interval_seconds", self.publish_interval_seconds)?;
        Ok(())
    }
}

/// Checks that `value` is a duration in seconds that `Duration` can hold.
fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| ConfigError::invalid(field, "must be a non-negative, finite number of seconds"))
}

fn positive_seconds(field: &'static str, value: f64) -> Result<Duration, ConfigError> {
    let duration = seconds(field, value)?;
    if duration.is_zero() {
        return Err(ConfigError::invalid(field, "must be greater than zero"));
    }
    Ok(duration)
}

/// Settings for the batch publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Articles per batch.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

const fn default_chunk_size() -> usize {
    30
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

impl PublishConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::invalid("publish.chunk_size", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.title_max_tokens, 50);
        assert_eq!(config.article_max_tokens, 1000);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_cms_base_url() {
        assert_eq!(CmsConfig::new("blog.example.com").base_url(), "https://blog.example.com");
        assert_eq!(CmsConfig::new("blog.example.com/").base_url(), "https://blog.example.com");
        assert_eq!(
            CmsConfig::new("http://127.0.0.1:8080").base_url(),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let pacing: PacingConfig = toml::from_str("").unwrap();
        assert_eq!(pacing, PacingConfig::default());

        let publish: PublishConfig = toml::from_str("").unwrap();
        assert_eq!(publish.chunk_size, 30);

        let cms: CmsConfig = toml::from_str("domain = \"blog.example.com\"").unwrap();
        assert!(cms.accept_invalid_certs);
        assert_eq!(cms.categories_per_page, 100);
    }

    #[test]
    fn test_pacing_validation() {
        assert!(PacingConfig::default().validate().is_ok());
        assert!(PacingConfig::disabled().validate().is_ok());
        let bad = PacingConfig {
            generation_interval_seconds: -1.0,
            ..PacingConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_timeouts_must_fit_a_duration() {
        assert!(GenerationConfig::default().validate().is_ok());
        assert!(CmsConfig::default().validate().is_ok());

        for value in [0.0, -3.0, 1e30, f64::INFINITY, f64::NAN] {
            let generation = GenerationConfig {
                timeout_seconds: value,
                ..GenerationConfig::default()
            };
            assert!(
                matches!(
                    generation.validate(),
                    Err(ConfigError::Invalid { field: "generation.timeout_seconds", .. })
                ),
                "{value} accepted"
            );

            let cms = CmsConfig {
                timeout_seconds: value,
                ..CmsConfig::default()
            };
            assert!(matches!(
                cms.validate(),
                Err(ConfigError::Invalid { field: "cms.timeout_seconds", .. })
            ));
        }
    }

    #[test]
    fn test_timeout_falls_back_when_unrepresentable() {
        let config = GenerationConfig {
            timeout_seconds: f64::INFINITY,
            ..GenerationConfig::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_oversized_pacing_rejected() {
        let bad = PacingConfig {
            publish_interval_seconds: 1e30,
            ..PacingConfig::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::Invalid { field: "pacing.publish_interval_seconds", .. })
        ));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = PublishConfig { chunk_size: 0 }.validate().unwrap_err();
        assert_eq!(err, ConfigError::invalid("publish.chunk_size", "must be at least 1"));
    }
}
