//! Moves: the options an agent picks at a pending choice.

use serde::{Deserialize, Serialize};

use super::piece::{PieceKey, Structure};
use super::resources::Resource;
use crate::board::SpaceId;

/// A single decision supplied to the interpreter.
///
/// The variant used depends on the pending choice's `OptionDomain`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameMove {
    /// Stop an open-ended sequence (no more units, resources, spaces).
    Pass,
    Bool(bool),
    Int(u8),
    Space(SpaceId),
    Piece(PieceKey),
    Resource(Resource),
    Structure(Structure),
}

impl std::fmt::Display for GameMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMove::Pass => write!(f, "pass"),
            GameMove::Bool(b) => write!(f, "{b}"),
            GameMove::Int(n) => write!(f, "{n}"),
            GameMove::Space(s) => write!(f, "{s}"),
            GameMove::Piece(p) => write!(f, "{:?} {:?}#{}", p.faction, p.kind, p.id),
            GameMove::Resource(r) => write!(f, "{r:?}"),
            GameMove::Structure(s) => write!(f, "{s:?}"),
        }
    }
}

/// Shape of a choice's options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionDomain {
    Boolean,
    /// Integers in `0..=max`.
    Integer { max: u8 },
    Space,
    /// Pieces, possibly with `Pass`.
    Piece,
    /// Resources, possibly with `Pass`.
    Resource,
    Structure,
}
