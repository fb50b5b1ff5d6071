//! Board pieces.
//!
//! Pieces are identified by `PieceKey` and carry no state of their own: the
//! location of every piece lives in `GameState`, which keeps a piece → space
//! map and a space → occupants map in step.

use serde::{Deserialize, Serialize};

use super::faction::Faction;
use super::mat::TopAction;

/// Kind of board piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Worker,
    Mech,
    Character,
    Structure,
}

impl PieceKind {
    /// Mechs and characters: the pieces that fight.
    #[must_use]
    pub const fn is_plastic(self) -> bool {
        matches!(self, PieceKind::Mech | PieceKind::Character)
    }

    /// Pieces that move and control spaces by presence.
    #[must_use]
    pub const fn is_unit(self) -> bool {
        !matches!(self, PieceKind::Structure)
    }
}

/// Identity of a single piece.
///
/// `id` is the worker number, the mech slot, 0 for the character, or the
/// structure index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceKey {
    pub faction: Faction,
    pub kind: PieceKind,
    pub id: u8,
}

impl PieceKey {
    #[must_use]
    pub const fn new(faction: Faction, kind: PieceKind, id: u8) -> Self {
        Self { faction, kind, id }
    }

    #[must_use]
    pub const fn worker(faction: Faction, id: u8) -> Self {
        Self::new(faction, PieceKind::Worker, id)
    }

    #[must_use]
    pub const fn mech(faction: Faction, slot: u8) -> Self {
        Self::new(faction, PieceKind::Mech, slot)
    }

    #[must_use]
    pub const fn character(faction: Faction) -> Self {
        Self::new(faction, PieceKind::Character, 0)
    }

    #[must_use]
    pub const fn structure(faction: Faction, structure: Structure) -> Self {
        Self::new(faction, PieceKind::Structure, structure as u8)
    }

    #[must_use]
    pub fn is_plastic(&self) -> bool {
        self.kind.is_plastic()
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.kind.is_unit()
    }
}

/// The four structures each faction may build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Structure {
    /// Connects its space to every tunnel for the owner's units.
    Mine,
    /// Its space produces as if it held an extra worker.
    Mill,
    /// One extra power whenever the owner bolsters.
    Armory,
    /// One extra popularity whenever the owner trades.
    Monument,
}

impl Structure {
    pub const ALL: [Structure; 4] = [
        Structure::Mine,
        Structure::Mill,
        Structure::Armory,
        Structure::Monument,
    ];

    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// The top action whose column this structure sits in.
    #[must_use]
    pub const fn column(self) -> TopAction {
        match self {
            Structure::Mine => TopAction::MoveGain,
            Structure::Mill => TopAction::Produce,
            Structure::Armory => TopAction::Bolster,
            Structure::Monument => TopAction::Trade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_kinds() {
        assert!(PieceKey::mech(Faction::Nordic, 0).is_plastic());
        assert!(PieceKey::character(Faction::Nordic).is_plastic());
        assert!(!PieceKey::worker(Faction::Nordic, 0).is_plastic());
        assert!(!PieceKey::structure(Faction::Nordic, Structure::Mill).is_unit());
    }

    #[test]
    fn test_structure_index_round_trip() {
        for s in Structure::ALL {
            assert_eq!(Structure::from_index(s as u8), Some(s));
        }
    }
}
