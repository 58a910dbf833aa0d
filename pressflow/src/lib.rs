//! # Pressflow
//!
//! Generate blog articles for every keyword x topic combination and publish
//! them to a WordPress site.
//!
//! A run moves through four stages, strictly one after another:
//!
//! - **Generation**: a title and an article body per job from an
//!   OpenAI-compatible completions endpoint, paced to respect rate limits
//! - **Authentication**: a JWT login against the WordPress site
//! - **Category resolution**: the operator's category name to its id
//! - **Publishing**: chunked, paced post creation with a recorded outcome per
//!   article
//!
//! The first three stages abort the run on failure. A failed post only marks
//! that article as failed.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pressflow::prelude::*;
//!
//! let config = RunConfig::builder()
//!     .keywords_text("coffee")
//!     .topics_text("history, health")
//!     .tone(Tone::Informative)
//!     .api_key(api_key)
//!     .domain("blog.example.com")
//!     .username("admin")
//!     .password(password)
//!     .category("Blog")
//!     .build()?;
//!
//! let report = run_pipeline(&config, Arc::new(LoggingEventSink::default()), cancel).await?;
//! println!("{} of {} published", report.succeeded(), report.articles.len());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod cms;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod generation;
pub mod observability;
pub mod pacing;
pub mod pipeline;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::cms::{AuthClient, BatchPublisher, CategoryResolver, CmsApi, WordPressClient};
    pub use crate::config::{parse_list, RunConfig, RunConfigBuilder, RunFile};
    pub use crate::core::{
        AuthToken, Category, CategoryId, GeneratedArticle, GenerationJob, Keyword, PublishResult,
        Tone, Topic,
    };
    pub use crate::errors::{
        AuthError, CategoryError, ConfigError, GenerationError, PipelineError, PublishItemError,
    };
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::generation::{
        CombinationGenerator, CompletionProvider, OpenAiCompletionProvider, TextGenerationClient,
    };
    pub use crate::pipeline::{run_pipeline, Pipeline, RunReport};
}
