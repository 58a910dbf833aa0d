//! The immutable run configuration and its builder.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::parse_list;
use super::settings::{CmsConfig, GenerationConfig, PacingConfig, PublishConfig};
use crate::core::{Keyword, Tone, Topic};
use crate::errors::ConfigError;

/// API key for the text-generation service.
pub struct GenerationCredentials {
    api_key: SecretString,
}

impl GenerationCredentials {
    /// Wraps an API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
        }
    }

    /// Returns the API key for the `Authorization` header.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl fmt::Debug for GenerationCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationCredentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// CMS administrator credentials.
pub struct CmsCredentials {
    username: String,
    password: SecretString,
}

impl CmsCredentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

impl fmt::Debug for CmsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmsCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything one pipeline run needs. Immutable once built.
#[derive(Debug)]
pub struct RunConfig {
    keywords: Vec<Keyword>,
    topics: Vec<Topic>,
    tone: Tone,
    generation_credentials: GenerationCredentials,
    cms_credentials: CmsCredentials,
    category_name: String,
    generation: GenerationConfig,
    cms: CmsConfig,
    pacing: PacingConfig,
    publish: PublishConfig,
}

impl RunConfig {
    /// Starts building a run configuration.
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Keywords, in operator order.
    #[must_use]
    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// Topics, in operator order.
    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Tone applied to every article.
    #[must_use]
    pub const fn tone(&self) -> Tone {
        self.tone
    }

    /// Text-generation API key.
    #[must_use]
    pub const fn generation_credentials(&self) -> &GenerationCredentials {
        &self.generation_credentials
    }

    /// CMS login.
    #[must_use]
    pub const fn cms_credentials(&self) -> &CmsCredentials {
        &self.cms_credentials
    }

    /// Name of the category every article is filed under.
    #[must_use]
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    /// Text-generation settings.
    #[must_use]
    pub const fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    /// CMS settings.
    #[must_use]
    pub const fn cms(&self) -> &CmsConfig {
        &self.cms
    }

    /// Pacing settings.
    #[must_use]
    pub const fn pacing(&self) -> &PacingConfig {
        &self.pacing
    }

    /// Publisher settings.
    #[must_use]
    pub const fn publish(&self) -> &PublishConfig {
        &self.publish
    }

    /// Number of articles the run will generate.
    #[must_use]
    pub fn job_count(&self) -> usize {
        self.keywords.len() * self.topics.len()
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug, Default)]
pub struct RunConfigBuilder {
    keywords: Vec<String>,
    topics: Vec<String>,
    tone: Tone,
    api_key: Option<SecretString>,
    username: Option<String>,
    password: Option<SecretString>,
    category_name: Option<String>,
    generation: GenerationConfig,
    cms: CmsConfig,
    pacing: PacingConfig,
    publish: PublishConfig,
}

impl RunConfigBuilder {
    /// Sets the keywords from individual entries.
    #[must_use]
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the keywords from comma-separated text.
    #[must_use]
    pub fn keywords_text(mut self, raw: &str) -> Self {
        self.keywords = parse_list(raw);
        self
    }

    /// Sets the topics from individual entries.
    #[must_use]
    pub fn topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the topics from comma-separated text.
    #[must_use]
    pub fn topics_text(mut self, raw: &str) -> Self {
        self.topics = parse_list(raw);
        self
    }

    /// Sets the tone.
    #[must_use]
    pub const fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Sets the text-generation API key.
    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Sets the CMS domain.
    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.cms.domain = domain.into();
        self
    }

    /// Sets the CMS username.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the CMS password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Sets the target category name.
    #[must_use]
    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }

    /// Replaces the text-generation settings.
    #[must_use]
    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Replaces the CMS settings, keeping an already-set domain if the new one is empty.
    #[must_use]
    pub fn cms(mut self, cms: CmsConfig) -> Self {
        let domain = std::mem::take(&mut self.cms.domain);
        self.cms = cms;
        if self.cms.domain.trim().is_empty() {
            self.cms.domain = domain;
        }
        self
    }

    /// Replaces the pacing settings.
    #[must_use]
    pub fn pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }

    /// Replaces the publisher settings.
    #[must_use]
    pub fn publish(mut self, publish: PublishConfig) -> Self {
        self.publish = publish;
        self
    }

    /// Validates the collected values and builds the configuration.
    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let keywords = self
            .keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .map(|k| Keyword::parse(k))
            .collect::<Result<Vec<_>, _>>()?;
        if keywords.is_empty() {
            return Err(ConfigError::MissingField("keywords"));
        }

        let topics = self
            .topics
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| Topic::parse(t))
            .collect::<Result<Vec<_>, _>>()?;
        if topics.is_empty() {
            return Err(ConfigError::MissingField("topics"));
        }

        let api_key = required_secret(self.api_key, "api_key")?;
        if self.cms.domain.trim().is_empty() {
            return Err(ConfigError::MissingField("domain"));
        }
        let username = required(self.username, "username")?;
        let password = required_secret(self.password, "password")?;
        let category_name = required(self.category_name, "category")?;

        self.generation.validate()?;
        self.cms.validate()?;
        self.pacing.validate()?;
        self.publish.validate()?;

        Ok(RunConfig {
            keywords,
            topics,
            tone: self.tone,
            generation_credentials: GenerationCredentials { api_key },
            cms_credentials: CmsCredentials {
                username: username.trim().to_string(),
                password,
            },
            category_name,
            generation: self.generation,
            cms: self.cms,
            pacing: self.pacing,
            publish: self.publish,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingField(field))
}

fn required_secret(
    value: Option<SecretString>,
    field: &'static str,
) -> Result<SecretString, ConfigError> {
    value
        .filter(|v| !v.expose_secret().trim().is_empty())
        .ok_or(ConfigError::MissingField(field))
}
