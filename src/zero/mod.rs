//! MCTS-Zero: search guided by an evaluator's values and move priors.
//!
//! ## Usage
//!
//! ```rust
//! use rust_factions::core::GameConfig;
//! use rust_factions::game::GameState;
//! use rust_factions::nn::UniformEvaluator;
//! use rust_factions::zero::{ZeroConfig, ZeroSearch};
//!
//! let state = GameState::new(GameConfig::default());
//! let config = ZeroConfig::default().with_min_simulations(16);
//! let mut search = ZeroSearch::new(config, UniformEvaluator);
//!
//! let decision = search.search(&state).expect("aligned priors");
//! let total: u32 = decision.visits.iter().map(|(_, n)| n).sum();
//! assert_eq!(total, 32);
//! ```

pub mod config;
pub mod search;

pub use config::ZeroConfig;
pub use search::{terminal_values, Branch, ZeroDecision, ZeroNode, ZeroSearch};
