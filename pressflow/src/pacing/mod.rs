//! Minimum inter-call spacing for rate-limited endpoints.
//!
//! Both upstream services impose usage limits, so every call to an endpoint
//! waits until a fixed interval has elapsed since the previous call to that
//! endpoint finished. The wait is a timer gate raced against the run's
//! [`CancellationToken`](crate::cancellation::CancellationToken) rather than a
//! blocking sleep.

mod pacer;

pub use pacer::Pacer;
