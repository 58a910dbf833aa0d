//! Cooperative cancellation for pipeline runs.
//!
//! A run checks its [`CancellationToken`] between external calls and races
//! it against pacing waits. In-flight requests are never interrupted, so a
//! cancelled run always reports exactly which articles were published.

mod token;

pub use token::CancellationToken;
