//! Monte Carlo Tree Search with uniform random rollouts.
//!
//! ## Overview
//!
//! - **Arena tree**: nodes hold game states and refer to each other by
//!   `NodeId`
//! - **UCT selection** from per-faction win counts
//! - **Null-move skipping**: choices with no options never become nodes
//! - **Deterministic**: a fixed seed replays the same search
//!
//! ## Usage
//!
//! ```rust
//! use rust_factions::core::GameConfig;
//! use rust_factions::game::GameState;
//! use rust_factions::mcts::{MCTSConfig, MCTSSearch};
//!
//! let state = GameState::new(GameConfig::default());
//! let config = MCTSConfig::default().with_iterations(8).with_rollout_limit(10);
//! let mut search = MCTSSearch::new(config);
//!
//! let mv = search.search(&state).expect("legal replay");
//! assert!(mv.is_some());
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

pub use config::MCTSConfig;
pub use node::{MCTSNode, NodeId};
pub use policy::{puct_score, uct_score, RandomSimulation, Rollout, SimulationPolicy};
pub use search::MCTSSearch;
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
