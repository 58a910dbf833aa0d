//! Error types for pressflow.
//!
//! Errors come in two levels. Setup stages (configuration, text generation,
//! authentication and category resolution) fail fast and surface as a
//! [`PipelineError`] that aborts the run. A failed publish of a single article
//! is a [`PublishItemError`]: it is recorded in that article's
//! [`PublishResult`](crate::core::PublishResult) and the run moves on.

use std::fmt;
use thiserror::Error;

/// A fatal error that stops a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The run configuration was incomplete or invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A title or article could not be generated.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// The CMS rejected the login.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// The target category could not be resolved.
    #[error("{0}")]
    Category(#[from] CategoryError),
}

impl PipelineError {
    /// Returns the name of the stage that failed.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Generation(_) => "generation",
            Self::Auth(_) => "auth",
            Self::Category(_) => "category",
        }
    }
}

/// Classification of text-generation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationErrorKind {
    /// The service could not be reached.
    Unreachable,
    /// The request timed out.
    Timeout,
    /// The service answered with a non-success status.
    Api,
    /// The service answered without any candidate text.
    EmptyResponse,
    /// The response body could not be decoded.
    Decode,
    /// The client was misconfigured.
    Config,
}

impl fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable => write!(f, "unreachable"),
            Self::Timeout => write!(f, "timeout"),
            Self::Api => write!(f, "api"),
            Self::EmptyResponse => write!(f, "empty_response"),
            Self::Decode => write!(f, "decode"),
            Self::Config => write!(f, "config"),
        }
    }
}

/// Error raised when the external completion service call fails.
#[derive(Debug, Clone, Error)]
#[error("Text generation failed ({kind}): {message}")]
pub struct GenerationError {
    /// What went wrong.
    pub kind: GenerationErrorKind,
    /// Human-readable detail.
    pub message: String,
    /// HTTP status, when the service answered.
    pub status: Option<u16>,
}

impl GenerationError {
    /// Creates a new generation error.
    #[must_use]
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Sets the HTTP status.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            GenerationErrorKind::Timeout
        } else if err.is_decode() {
            GenerationErrorKind::Decode
        } else if err.is_builder() {
            GenerationErrorKind::Config
        } else {
            GenerationErrorKind::Unreachable
        };
        Self::new(kind, err.to_string())
    }
}

/// Transport-level failure talking to the CMS.
#[derive(Debug, Clone, Error)]
pub enum CmsError {
    /// The request never produced a response.
    #[error("CMS request failed: {0}")]
    Transport(String),

    /// The CMS answered with an unexpected status.
    #[error("CMS returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The response body was not what the CMS API documents.
    #[error("Unexpected CMS response: {0}")]
    Decode(String),

    /// The client could not be built from its configuration.
    #[error("Invalid CMS configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for CmsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Error raised when the CMS login does not yield a token.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token endpoint answered with a non-OK status.
    #[error(
        "Failed to authenticate with WordPress. Please check your admin username and password. (HTTP {status})"
    )]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The token endpoint could not be reached.
    #[error("Failed to authenticate with WordPress: {0}")]
    Unreachable(#[from] CmsError),

    /// The token endpoint answered OK without a usable token.
    #[error("Failed to authenticate with WordPress: malformed token response ({0})")]
    MalformedResponse(String),
}

/// Error raised when the target category cannot be resolved.
#[derive(Debug, Clone, Error)]
pub enum CategoryError {
    /// No category carries the requested name.
    #[error("Failed to find category ID for category: {0}")]
    NotFound(String),

    /// The category list could not be fetched.
    #[error("Failed to fetch categories: {0}")]
    Fetch(#[from] CmsError),
}

/// A failed publish of one article. Recorded, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct PublishItemError {
    /// HTTP status, when the CMS answered.
    pub status: Option<u16>,
    /// Response body or transport message.
    pub message: String,
}

impl PublishItemError {
    /// Creates an error for a non-success CMS response.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: body.into(),
        }
    }

    /// Creates an error for a request that produced no response.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for PublishItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<CmsError> for PublishItemError {
    fn from(err: CmsError) -> Self {
        match err {
            CmsError::Status { status, body } => Self::status(status, body),
            other => Self::transport(other.to_string()),
        }
    }
}

/// Error raised when a run configuration is incomplete or invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required field was empty.
    #[error("Please fill out all fields before generating and publishing the articles (missing: {0})")]
    MissingField(&'static str),

    /// A field carried an unusable value.
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The tone is not one of the supported options.
    #[error("Unknown tone '{0}' (expected Funny, Serious or Informative)")]
    UnknownTone(String),

    /// A configuration file could not be read.
    #[error("Failed to read config file {path}: {reason}")]
    Read {
        /// File path.
        path: String,
        /// Underlying IO error.
        reason: String,
    },

    /// A configuration file could not be parsed.
    #[error("Failed to parse config file: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
