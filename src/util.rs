//! Timing helpers for logging how long sampling passes take.

use std::time::Instant;

/// RAII timer that logs elapsed time (and throughput, if a count was
/// recorded) on drop.
///
/// # Example
/// ```ignore
/// let mut t = Timed::info("Sampling neighbor frames");
/// // ... produce 1000 examples ...
/// t.set_count(1000);
/// // logs "Sampling neighbor frames: 12.3ms (81300/s)" when t is dropped
/// ```
pub struct Timed {
    name: &'static str,
    start: Instant,
    level: log::Level,
    count: Option<usize>,
}

impl Timed {
    /// Create a new timer that logs at INFO level.
    pub fn info(name: &'static str) -> Self {
        Self::new(name, log::Level::Info)
    }

    /// Create a new timer that logs at DEBUG level.
    pub fn debug(name: &'static str) -> Self {
        Self::new(name, log::Level::Debug)
    }

    fn new(name: &'static str, level: log::Level) -> Self {
        log::trace!("{}...", name);
        Self {
            name,
            start: Instant::now(),
            level,
            count: None,
        }
    }

    /// Record how many items the timed section produced.
    pub fn set_count(&mut self, count: usize) {
        self.count = Some(count);
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        match self.count {
            Some(n) if elapsed.as_secs_f64() > 0.0 => log::log!(
                self.level,
                "{}: {:.3?} ({:.0}/s)",
                self.name,
                elapsed,
                n as f64 / elapsed.as_secs_f64()
            ),
            _ => log::log!(self.level, "{}: {:.3?}", self.name, elapsed),
        }
    }
}
