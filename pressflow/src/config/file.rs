//! TOML run files for the command-line surface.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::parse_list;
use super::run::RunConfigBuilder;
use super::settings::{CmsConfig, GenerationConfig, PacingConfig, PublishConfig};
use crate::core::Tone;
use crate::errors::ConfigError;

/// A keyword or topic list, written either as comma-separated text or as an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListInput {
    /// `"coffee, tea"`
    Text(String),
    /// `["coffee", "tea"]`
    Items(Vec<String>),
}

impl ListInput {
    /// Returns the trimmed, non-empty entries.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::Text(raw) => parse_list(raw),
            Self::Items(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl Default for ListInput {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

/// CMS section of a run file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CmsSection {
    /// Admin username.
    #[serde(default)]
    pub username: Option<String>,
    /// Admin password. Prefer the environment over writing it here.
    #[serde(default)]
    pub password: Option<String>,
    /// Connection settings.
    #[serde(flatten)]
    pub settings: CmsConfig,
}

/// Generation section of a run file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationSection {
    /// API key. Prefer the environment over writing it here.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Service settings.
    #[serde(flatten)]
    pub settings: GenerationConfig,
}

/// On-disk description of a run.
///
/// ```toml
/// keywords = "coffee, tea"
/// topics = ["history", "health"]
/// tone = "Informative"
/// category = "Blog"
///
/// [cms]
/// domain = "blog.example.com"
/// username = "admin"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunFile {
    /// Keywords.
    #[serde(default)]
    pub keywords: ListInput,
    /// Topics.
    #[serde(default)]
    pub topics: ListInput,
    /// Tone name.
    #[serde(default)]
    pub tone: Option<String>,
    /// Target category name.
    #[serde(default)]
    pub category: Option<String>,
    /// Text-generation service.
    #[serde(default)]
    pub generation: GenerationSection,
    /// CMS.
    #[serde(default)]
    pub cms: CmsSection,
    /// Pacing.
    #[serde(default)]
    pub pacing: PacingConfig,
    /// Publisher.
    #[serde(default)]
    pub publish: PublishConfig,
}

impl RunFile {
    /// Reads and parses a run file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parses a run file from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Turns the file into a builder; callers overlay flags before building.
    pub fn into_builder(self) -> Result<RunConfigBuilder, ConfigError> {
        let tone = match self.tone.as_deref() {
            Some(name) => name.parse::<Tone>()?,
            None => Tone::default(),
        };

        let mut builder = RunConfigBuilder::default()
            .keywords(self.keywords.entries())
            .topics(self.topics.entries())
            .tone(tone)
            .generation(self.generation.settings)
            .cms(self.cms.settings)
            .pacing(self.pacing)
            .publish(self.publish);

        if let Some(api_key) = self.generation.api_key {
            builder = builder.api_key(api_key);
        }
        if let Some(username) = self.cms.username {
            builder = builder.username(username);
        }
        if let Some(password) = self.cms.password {
            builder = builder.password(password);
        }
        if let Some(category) = self.category {
            builder = builder.category(category);
        }
        Ok(builder)
    }
}
