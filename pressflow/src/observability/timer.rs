//! Wall-clock timing for external calls.

use std::time::Instant;

/// Measures how long a named operation takes.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: &'static str,
}

impl SpanTimer {
    /// Starts timing.
    #[must_use]
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the operation name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Stops timing and returns the elapsed milliseconds.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_measures_elapsed() {
        let timer = SpanTimer::start("cms.post");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(timer.name(), "cms.post");
        assert!(timer.finish() >= 5.0);
    }
}
