//! Fakes and fixtures for exercising a run without network access.
//!
//! [`ScriptedCompletionProvider`] and [`InMemoryCms`] implement the service
//! seams, so a [`Pipeline`](crate::pipeline::Pipeline) can run end to end in
//! a unit test.

mod fixtures;
mod mocks;

pub use fixtures::{sample_articles, sample_config};
pub use mocks::{InMemoryCms, ScriptedCompletionProvider};
