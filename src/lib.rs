//! # rust-factions
//!
//! A two-faction mech board game engine driven by search agents.
//!
//! ## Design Principles
//!
//! 1. **Immutable states**: every move produces a new `GameState` that
//!    shares unchanged structure with the old one (`im` persistent
//!    collections), so searches clone freely.
//!
//! 2. **One execution protocol**: every rule is an `Action` on the state's
//!    stack. The interpreter drains state changes and stops at the next
//!    choice; agents only ever answer choices.
//!
//! 3. **Explicit verbosity**: logging is controlled by a `Verbosity` value
//!    passed to each call, never by global state. Searches replay silently.
//!
//! ## Architecture
//!
//! - **Plain MCTS**: UCT selection, random rollouts, per-faction win counts.
//!
//! - **MCTS-Zero**: PUCT selection over evaluator priors, one blocking
//!   evaluation per new node, move sampled from root visits.
//!
//! ## Modules
//!
//! - `core`: seats, per-seat maps, RNG, configuration, errors
//! - `board`: the map and per-faction movement tables
//! - `game`: factions, mats, pieces, players and the state value
//! - `actions`: the action catalogue
//! - `rules`: the interpreter, cost payment, scoring
//! - `agents`: the move-choice surface and a game runner
//! - `mcts`: Monte Carlo Tree Search
//! - `zero`: policy/value-guided search
//! - `nn`: evaluator interface, encoder, channel transport
//! - `training`: self-play trajectories

pub mod core;
pub mod board;
pub mod game;
pub mod actions;
pub mod rules;
pub mod agents;
pub mod mcts;
pub mod zero;
pub mod nn;
pub mod training;

// Re-export commonly used types
pub use crate::core::{
    GameConfig, GameOver, GameRng, Outcome, PlayerId, PlayerMap, RulesError, SearchError,
    Verbosity,
};

pub use crate::board::{BoardMap, SpaceId, Terrain};

pub use crate::game::{Faction, GameMove, GameResult, GameState, MatKind, PieceKey, Resource};

pub use crate::actions::{Action, Choice, StateChange};

pub use crate::rules::{
    apply_move, deciding_player, final_result, is_over, legal_moves, winner, StructureBonus,
};

pub use crate::agents::{run_game, Agent, MctsAgent, RandomAgent, ZeroAgent};

pub use crate::mcts::{MCTSConfig, MCTSSearch, MCTSTree, MCTSNode, NodeId, SearchStats, TreeStats};

pub use crate::zero::{ZeroConfig, ZeroDecision, ZeroSearch};

pub use crate::nn::{
    evaluator_channel, ChannelEvaluator, EncodedState, Evaluation, EvaluationRequest, Evaluator,
    FeatureEncoder, StateEncoder, UniformEvaluator,
};

pub use crate::training::{ExperienceBuffer, SelfPlayConfig, SelfPlayWorker, Trajectory};
