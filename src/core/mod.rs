//! Core engine types: seats, per-seat maps, RNG, configuration, errors.
//!
//! These are the ambient building blocks every other module depends on.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{GameConfig, Verbosity};
pub use error::{GameOver, Outcome, RulesError, SearchError};
pub use player::{PlayerId, PlayerMap, SEATS};
pub use rng::GameRng;
