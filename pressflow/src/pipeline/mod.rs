//! Pipeline execution.
//!
//! A run is strictly sequential:
//! 1. expand keywords x topics and generate a title and article for each job
//! 2. log in to the CMS
//! 3. resolve the target category
//! 4. publish every article in paced chunks
//!
//! Steps 1 to 3 are fatal on failure. A failed publish is recorded and the
//! run moves on to the next article.

mod report;
mod runner;

pub use report::RunReport;
pub use runner::{run_pipeline, Pipeline};
