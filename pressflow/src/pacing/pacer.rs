//! Timer-gated pacer.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::cancellation::CancellationToken;

/// Enforces a minimum spacing between consecutive calls to one endpoint.
#[derive(Debug)]
pub struct Pacer {
    name: &'static str,
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Creates a pacer for the named endpoint.
    #[must_use]
    pub const fn new(name: &'static str, interval: Duration) -> Self {
        Self {
            name,
            interval,
            last_call: Mutex::new(None),
        }
    }

    /// Creates a pacer from an interval in seconds.
    ///
    /// Negative or NaN values mean no pacing; values too large for a
    /// `Duration` saturate.
    #[must_use]
    pub fn from_seconds(name: &'static str, seconds: f64) -> Self {
        let interval = if seconds.is_nan() || seconds <= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
        };
        Self::new(name, interval)
    }

    /// Returns the endpoint name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns how long the next call would have to wait right now.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.last_call
            .lock()
            .map(|last| {
                last.checked_add(self.interval)
                    .map_or(Duration::MAX, |next| next.saturating_duration_since(Instant::now()))
            })
            .unwrap_or_default()
    }

    /// Waits until the next call is allowed.
    ///
    /// Returns `false` if the token was cancelled before or during the wait,
    /// in which case the caller must not issue the call.
    pub async fn ready(&self, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }

        let wait = self.remaining();
        if !wait.is_zero() {
            debug!(
                endpoint = self.name,
                wait_ms = wait.as_millis() as u64,
                "Pacing before next call"
            );
            tokio::select! {
                biased;
                () = cancel.cancelled() => return false,
                () = tokio::time::sleep(wait) => {}
            }
        }

        !cancel.is_cancelled()
    }

    /// Records that a call to the endpoint has just finished.
    pub fn mark(&self) {
        *self.last_call.lock() = Some(Instant::now());
    }
}
