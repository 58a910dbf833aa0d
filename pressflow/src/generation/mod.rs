//! Article generation.
//!
//! This module provides:
//! - [`CombinationGenerator`] expanding keywords x topics into jobs
//! - [`CompletionProvider`], the seam to the external completion service
//! - [`OpenAiCompletionProvider`], the HTTP implementation of that seam
//! - [`TextGenerationClient`], which turns jobs into titles and article bodies

mod client;
mod combinations;
mod openai;
mod provider;

pub use client::{article_prompt, clean_title, title_prompt, TextGenerationClient};
pub use combinations::{CombinationGenerator, Jobs};
pub use openai::OpenAiCompletionProvider;
pub use provider::{CompletionProvider, CompletionRequest};

#[cfg(test)]
pub use provider::MockCompletionProvider;
