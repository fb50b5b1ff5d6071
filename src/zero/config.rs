//! MCTS-Zero configuration.

use serde::{Deserialize, Serialize};

use crate::core::Verbosity;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZeroConfig {
    /// PUCT exploration weight.
    pub c_puct: f64,

    /// Simulations per legal move at the root.
    pub simulations_per_move: u32,

    /// Floor on the simulation budget.
    pub min_simulations: u32,

    /// Seed for sampling the played move.
    pub seed: u64,

    pub verbosity: Verbosity,
}

impl Default for ZeroConfig {
    fn default() -> Self {
        Self {
            c_puct: 1.5,
            simulations_per_move: 8,
            min_simulations: 32,
            seed: 42,
            verbosity: Verbosity::Silent,
        }
    }
}

impl ZeroConfig {
    pub fn with_c_puct(mut self, c: f64) -> Self {
        self.c_puct = c;
        self
    }

    pub fn with_simulations_per_move(mut self, simulations: u32) -> Self {
        self.simulations_per_move = simulations;
        self
    }

    pub fn with_min_simulations(mut self, simulations: u32) -> Self {
        self.min_simulations = simulations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Simulations for a root with `branching` legal moves; never below 1.
    #[must_use]
    pub fn budget(&self, branching: usize) -> u32 {
        let scaled = self
            .simulations_per_move
            .saturating_mul(u32::try_from(branching).unwrap_or(u32::MAX));
        scaled.max(self.min_simulations).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_scales_with_branching() {
        let config = ZeroConfig::default()
            .with_simulations_per_move(5)
            .with_min_simulations(12);
        assert_eq!(config.budget(2), 12);
        assert_eq!(config.budget(4), 20);
        assert_eq!(config.budget(0), 12);
    }

    #[test]
    fn test_budget_has_a_floor_of_one() {
        let config = ZeroConfig::default()
            .with_simulations_per_move(0)
            .with_min_simulations(0);
        assert_eq!(config.budget(4), 1);
        assert_eq!(config.budget(0), 1);
    }

    #[test]
    fn test_config_serialization() {
        let config = ZeroConfig::default().with_c_puct(2.0).with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let back: ZeroConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
