//! Core domain model types for pressflow.
//!
//! This module contains the values that flow through a run:
//! - Operator inputs (keywords, topics, tone)
//! - Generation jobs and the articles they produce
//! - CMS-side values (auth token, categories)
//! - Per-article publish outcomes

mod article;
mod cms;
mod input;
mod outcome;

pub use article::{GeneratedArticle, GenerationJob};
pub use cms::{AuthToken, Category, CategoryId};
pub use input::{Keyword, Tone, Topic};
pub use outcome::PublishResult;
