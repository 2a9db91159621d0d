use std::time::Duration;

/// Fixed-period step scheduler.
///
/// Feed it elapsed frame time; it reports when a step is due. At most one
/// step fires per [`Ticker::advance`] call, so a slow frame never runs two
/// steps back to back. Leftover time beyond one period is dropped.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    accumulated: Duration,
    running: bool,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker {
            interval,
            accumulated: Duration::ZERO,
            running: false,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin ticking from zero, discarding anything pending
    pub fn start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.running = true;
    }

    /// Stop ticking; no further steps fire until `start`
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulated = Duration::ZERO;
    }

    /// Add `elapsed` time and return whether one step is due
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.running {
            return false;
        }

        self.accumulated += elapsed;
        if self.accumulated >= self.interval {
            self.accumulated = (self.accumulated - self.interval).min(self.interval);
            true
        } else {
            false
        }
    }
}
