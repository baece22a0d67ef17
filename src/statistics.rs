//! Per-tick population statistics reported by the simulation.

use crate::constants::MAX_COLORS;
use serde::{Deserialize, Serialize};

/// Counts observed during a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestepStatistics {
    pub num_self_replicators: [u64; MAX_COLORS],
    pub num_cells: [u64; MAX_COLORS],
    pub num_particles: u64,
}

impl TimestepStatistics {
    pub fn total_self_replicators(&self) -> u64 {
        self.num_self_replicators.iter().sum()
    }

    pub fn total_cells(&self) -> u64 {
        self.num_cells.iter().sum()
    }
}

/// Source of per-tick statistics and the tick counter.
pub trait StatisticsFeed {
    fn statistics(&self) -> TimestepStatistics;

    /// Monotonically increasing tick counter.
    fn current_timestep(&self) -> u64;
}
