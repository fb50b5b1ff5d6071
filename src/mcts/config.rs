//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use crate::core::Verbosity;

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// Iterations run per decision.
    pub iterations: u32,

    /// UCT exploration weight (default: sqrt(2)).
    /// Higher values favor exploration over exploitation.
    pub temperature: f64,

    /// Maximum nodes to allocate in the tree.
    /// Iterations stop early once the arena is this large.
    pub max_nodes: usize,

    /// Moves a rollout may play before it is scored as it stands
    /// (0 = play to the end).
    pub rollout_limit: u32,

    /// Random seed for expansion and rollouts.
    /// Same seed produces deterministic searches.
    pub seed: u64,

    /// How much the search reports. Rollouts always replay silently.
    pub verbosity: Verbosity,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            temperature: std::f64::consts::SQRT_2,
            max_nodes: 100_000,
            rollout_limit: 0,
            seed: 42,
            verbosity: Verbosity::Silent,
        }
    }
}

impl MCTSConfig {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the UCT exploration weight.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Cap rollout length; a capped rollout is scored by the end-of-game
    /// rules at the state it reached.
    pub fn with_rollout_limit(mut self, moves: u32) -> Self {
        self.rollout_limit = moves;
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert!((config.temperature - 1.414).abs() < 0.01);
        assert_eq!(config.rollout_limit, 0);
        assert_eq!(config.verbosity, Verbosity::Silent);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_iterations(50)
            .with_temperature(0.7)
            .with_seed(123)
            .with_rollout_limit(40);

        assert_eq!(config.iterations, 50);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.seed, 123);
        assert_eq!(config.rollout_limit, 40);
    }

    #[test]
    fn test_config_serialization() {
        let config = MCTSConfig::default().with_verbosity(Verbosity::Turns);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MCTSConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
