use std::collections::VecDeque;
use std::time::Duration;

/// Rolling window of recent pass durations for instrumentation.
#[derive(Debug, Clone)]
pub struct PassTimer {
    history: VecDeque<Duration>,
    capacity: usize,
}

impl PassTimer {
    /// A timer remembering the last `capacity` samples (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, sample: Duration) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(sample);
    }

    pub fn count(&self) -> usize {
        self.history.len()
    }

    pub fn average(&self) -> Duration {
        if self.history.is_empty() {
            return Duration::ZERO;
        }
        self.history.iter().sum::<Duration>() / self.history.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.history.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.history.iter().copied().min().unwrap_or(Duration::ZERO)
    }
}
