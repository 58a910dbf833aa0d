//! Logging setup and call timing.

mod subscriber;
mod timer;

pub use subscriber::{init_tracing, DEFAULT_FILTER};
pub use timer::SpanTimer;
