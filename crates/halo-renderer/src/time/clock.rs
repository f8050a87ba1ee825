use std::time::Instant;

/// Millisecond timestamp source.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Milliseconds elapsed since the clock was created.
///
/// Monotonic, so frame timestamps never go backwards across wall-clock
/// adjustments.
#[derive(Debug, Copy, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Rebases the clock so that `now_ms` restarts from zero.
    pub fn reset(&mut self) {
        self.origin = Instant::now();
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
