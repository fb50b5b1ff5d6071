//! Self-play data collection for evaluator training.
//!
//! ## Overview
//!
//! - **Trajectory**: one game's searched decisions with visit counts and
//!   the final result
//! - **ExperienceBuffer**: bounded FIFO of training samples with seeded
//!   batch sampling
//! - **SelfPlayWorker**: plays episodes with MCTS-Zero on both seats
//!
//! ## Usage
//!
//! ```rust
//! use rust_factions::core::GameConfig;
//! use rust_factions::game::GameState;
//! use rust_factions::nn::UniformEvaluator;
//! use rust_factions::training::{ExperienceBuffer, SelfPlayConfig, SelfPlayWorker};
//! use rust_factions::zero::ZeroConfig;
//!
//! let config = SelfPlayConfig::default()
//!     .with_zero(ZeroConfig::default().with_min_simulations(4).with_simulations_per_move(1))
//!     .with_max_moves(10);
//! let mut worker = SelfPlayWorker::new(config, UniformEvaluator);
//!
//! let trajectory = worker
//!     .play_episode(GameState::new(GameConfig::default()), 0)
//!     .expect("aligned priors");
//! let bytes = trajectory.to_bytes().expect("serialisable");
//!
//! let mut buffer = ExperienceBuffer::new(100);
//! buffer.extend_from(&trajectory);
//! assert!(!bytes.is_empty());
//! assert!(buffer.sample_batch(4, 7).len() <= 4);
//! ```

pub mod self_play;
pub mod trajectory;

pub use self_play::{SelfPlayConfig, SelfPlayWorker};
pub use trajectory::{ExperienceBuffer, Step, TrainingSample, Trajectory};
