//! Run configuration.
//!
//! A run is described by one immutable [`RunConfig`] value built through
//! [`RunConfigBuilder`]. Operator surfaces keep their own form state and only
//! hand a finished configuration to the pipeline.

mod file;
mod run;
mod settings;

pub use file::{CmsSection, GenerationSection, ListInput, RunFile};
pub use run::{CmsCredentials, GenerationCredentials, RunConfig, RunConfigBuilder};
pub use settings::{CmsConfig, GenerationConfig, PacingConfig, PublishConfig};

/// Splits comma-separated operator input into trimmed, non-empty entries.
///
/// Order and duplicates are preserved.
#[must_use]
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}
