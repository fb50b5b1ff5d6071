//! Agents: interchangeable move pickers and a game runner.
//!
//! Every agent answers `select_move(state)` for the pending choice; the
//! runner hands each decision to the agent sitting at the deciding seat.

pub mod agent;
pub mod runner;

pub use agent::{Agent, MctsAgent, RandomAgent, ZeroAgent};
pub use runner::run_game;
