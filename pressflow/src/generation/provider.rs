//! The completion-service seam.

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::GenerationError;

/// One completion request.
///
/// Mirrors the legacy completions API: a single prompt, one candidate, no stop
/// sequences. Sampling knobs left as `None` fall back to the service default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Prompt text.
    pub prompt: String,
    /// Generation cap in tokens.
    pub max_tokens: u32,
    /// Number of candidates; always 1.
    pub n: u32,
    /// Stop sequences; always none.
    pub stop: Option<Vec<String>>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling mass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Frequency penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    /// Presence penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
}

impl CompletionRequest {
    /// Creates a request with one candidate and no stop sequences.
    #[must_use]
    pub fn new(prompt: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            n: 1,
            stop: None,
            temperature,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
        }
    }

    /// Pins nucleus sampling off and both penalties to zero.
    #[must_use]
    pub const fn deterministic_sampling(mut self) -> Self {
        self.top_p = Some(1.0);
        self.frequency_penalty = Some(0.0);
        self.presence_penalty = Some(0.0);
        self
    }
}

/// An external text-completion service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one request and returns the first candidate's text, unprocessed.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}
