//! Moving-average smoothing over a bounded reading history.
//!
//! Every sensor owns one [`History`]. Pushing a reading appends it, drops
//! the oldest reading once the window is over capacity, and returns the
//! mean of what is left. The append happens before the mean, so the first
//! push returns the reading itself.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Default number of readings averaged per sensor.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Bounded, insertion-ordered window of raw readings.
#[derive(Debug, Clone)]
pub struct History {
    /// Readings, oldest first.
    values: VecDeque<f64>,
    capacity: NonZeroUsize,
}

impl History {
    /// Create an empty history holding at most `capacity` readings.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity.get() + 1),
            capacity,
        }
    }

    /// Add a reading and return the mean of the retained window.
    pub fn push(&mut self, raw: f64) -> f64 {
        self.values.push_back(raw);
        if self.values.len() > self.capacity.get() {
            self.values.pop_front();
        }

        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Mean of the current window, `None` before the first reading.
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }

    /// Retained readings, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// True once the window holds `capacity` readings.
    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity.get()
    }

    /// Drop all readings, keeping the capacity.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_HISTORY_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}
