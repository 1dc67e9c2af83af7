use std::collections::VecDeque;

use crate::world::TickReport;

/// Points kept for the population chart.
pub const DEFAULT_CAPACITY: usize = 100;

/// Bounded trailing window of per-tick reports. Once full, the oldest point
/// falls off for each new one, so the chart always shows the most recent
/// stretch of the run.
#[derive(Clone, Debug)]
pub struct History {
    points: VecDeque<TickReport>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be nonzero");
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, report: TickReport) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(report);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest-first copy for serialization.
    pub fn points(&self) -> Vec<TickReport> {
        self.points.iter().copied().collect()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
