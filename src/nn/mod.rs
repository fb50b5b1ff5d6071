//! Evaluator integration for MCTS-Zero.
//!
//! ## Overview
//!
//! - **Interface**: `Evaluator` answers an `EvaluationRequest` with an
//!   `Evaluation` (value per seat, prior per legal move)
//! - **Encoding**: `StateEncoder` and the baseline `FeatureEncoder`
//! - **Transport**: `ChannelEvaluator` blocks on an in-process channel
//!   served by an `EvaluatorEndpoint` on another thread
//! - **Baseline**: `UniformEvaluator` for testing
//!
//! ## Usage
//!
//! ```rust
//! use rust_factions::core::GameConfig;
//! use rust_factions::game::GameState;
//! use rust_factions::nn::{evaluator_channel, Evaluator, FeatureEncoder, StateEncoder, UniformEvaluator};
//! use rust_factions::nn::EvaluationRequest;
//! use rust_factions::rules::{deciding_player, legal_moves};
//!
//! let (mut evaluator, endpoint) = evaluator_channel();
//! let server = std::thread::spawn(move || endpoint.serve(UniformEvaluator));
//!
//! let state = GameState::new(GameConfig::default());
//! let seat = deciding_player(&state).unwrap();
//! let (board, aux) = FeatureEncoder::new().encode(&state, seat);
//! let request = EvaluationRequest { board, aux, legal_moves: legal_moves(&state), seat };
//! let evaluation = evaluator.evaluate(request).unwrap();
//! assert_eq!(evaluation.priors.len(), 4);
//!
//! drop(evaluator);
//! server.join().unwrap().unwrap();
//! ```

pub mod channel;
pub mod encoder;
pub mod traits;

pub use channel::{evaluator_channel, ChannelEvaluator, EvaluatorEndpoint};
pub use encoder::{FeatureEncoder, StateEncoder};
pub use traits::{EncodedState, Evaluation, EvaluationRequest, Evaluator, UniformEvaluator};
