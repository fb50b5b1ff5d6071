//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Statistics collected during one search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub iterations: u32,

    /// Nodes added to the tree.
    pub nodes_expanded: u32,

    pub rollouts: u32,

    /// Moves played across all rollouts.
    pub rollout_moves: u64,

    /// Deepest node selected or created.
    pub max_depth: u16,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Note a node at `depth`, saturating at `u16::MAX`.
    pub fn reach_depth(&mut self, depth: usize) {
        let depth = u16::try_from(depth).unwrap_or(u16::MAX);
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record the time elapsed since `start`.
    pub fn finish_timer(&mut self, start: Instant) {
        self.time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            f64::from(self.iterations) / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Mean rollout length in moves.
    #[must_use]
    pub fn avg_rollout_length(&self) -> f64 {
        if self.rollouts == 0 {
            0.0
        } else {
            self.rollout_moves as f64 / f64::from(self.rollouts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_iterations_per_second() {
        let mut stats = SearchStats::new();
        stats.iterations = 1000;
        stats.time_us = 1_000_000;
        assert_eq!(stats.iterations_per_second(), 1000.0);
    }

    #[test]
    fn test_avg_rollout_length() {
        let mut stats = SearchStats::new();
        assert_eq!(stats.avg_rollout_length(), 0.0);
        stats.rollouts = 4;
        stats.rollout_moves = 10;
        assert!((stats.avg_rollout_length() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_reach_depth_saturates() {
        let mut stats = SearchStats::new();
        stats.reach_depth(3);
        stats.reach_depth(1);
        assert_eq!(stats.max_depth, 3);
        stats.reach_depth(usize::from(u16::MAX) + 7);
        assert_eq!(stats.max_depth, u16::MAX);
    }

    #[test]
    fn test_finish_timer() {
        let mut stats = SearchStats::new();
        let Some(start) = Instant::now().checked_sub(std::time::Duration::from_millis(5)) else {
            return;
        };
        stats.finish_timer(start);
        assert!(stats.time_us >= 5_000);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = SearchStats::new();
        stats.iterations = 100;
        stats.rollouts = 50;
        stats.reset();
        assert_eq!(stats, SearchStats::default());
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = SearchStats::new();
        stats.iterations = 42;
        let json = serde_json::to_string(&stats).unwrap();
        let deserialized: SearchStats = serde_json::from_str(&json).unwrap();
        assert_eq!(stats, deserialized);
    }
}
