use crate::preload::grid::GridSampler;

/// Turns processed work units into percentage ticks.
///
/// A unit is one grid point or one step reset. Each tick reports the share of
/// units finished *before* the current one, so the first tick of a session
/// is 0 and no intermediate tick can reach 100. Only [`ProgressTracker::finish`]
/// yields 100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressTracker {
    total: u64,
    processed: u64,
}

impl ProgressTracker {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            processed: 0,
        }
    }

    /// Tracker sized for `steps` steps: every grid point plus one reset per step
    pub fn for_steps(steps: u32) -> Self {
        let total = (1..=steps)
            .map(|step| (GridSampler::point_count_for_step(step) as u64).saturating_add(1))
            .fold(0u64, u64::saturating_add);
        Self::new(total)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Account for one finished unit and return the tick value to report for it
    pub fn advance(&mut self) -> u8 {
        let value = if self.total == 0 {
            0
        } else {
            (self.processed.min(self.total - 1) as u128 * 100 / self.total as u128) as u8
        };
        self.processed = (self.processed + 1).min(self.total);
        value
    }

    /// Value of the terminal tick
    pub fn finish(&mut self) -> u8 {
        self.processed = self.total;
        100
    }
}
