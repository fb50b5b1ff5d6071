//! Game data: factions, mats, pieces, players and the state value.
//!
//! This module holds data and the low-level helpers that edit a state
//! clone. Rules (what may happen and in which order) live in `actions` and
//! `rules`.

mod control;
pub mod cost;
pub mod faction;
pub mod mat;
pub mod moves;
pub mod piece;
pub mod player;
pub mod resources;
pub mod state;

pub use cost::Cost;
pub use faction::{Faction, MechAbility};
pub use mat::{BottomAction, EnlistBonus, MatKind, TopAction, TopUpgrade};
pub use moves::{GameMove, OptionDomain};
pub use piece::{PieceKey, PieceKind, Structure};
pub use player::{
    Player, StarKind, Stars, MAX_POPULARITY, MAX_POWER, MAX_WORKERS, STARTING_WORKERS, STAR_LIMIT,
};
pub use resources::{Resource, Resources};
pub use state::{GameResult, GameState, COMBAT_DECK};
