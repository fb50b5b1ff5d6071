//! Factions and their mech abilities.
//!
//! Each faction has fixed starting power and combat cards, four mech
//! abilities unlocked one per deployed mech (slot order), a pair of terrains
//! its Riverwalk reaches, and one faction-wide trait.

use serde::{Deserialize, Serialize};

use crate::board::{SpaceId, Terrain};

/// The five playable factions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Faction {
    Nordic,
    Rusviet,
    Polania,
    Crimea,
    Saxony,
}

/// Mech abilities, unlocked by deploying the mech in the matching slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MechAbility {
    /// Mechs and the character cross rivers into the faction's two terrains.
    Riverwalk,
    /// Mechs and the character may enter and leave lakes.
    Seaworthy,
    /// Lakes are adjacent to each other and enterable.
    Submerge,
    /// Villages are adjacent to the factory.
    Township,
    /// Mountains and tunnels are adjacent to each other.
    Underpass,
    /// Mechs and the character may move to their own or any inactive home base.
    Wayfare,
    /// Mechs and the character move up to two spaces.
    Speed,
    /// Pay one power in combat to reduce the opponent's total by two.
    Artillery,
    /// One extra combat card in combats where a worker is present.
    PeoplesArmy,
    /// No popularity loss for displacing enemy workers by movement.
    Camaraderie,
    /// Steal one uncommitted combat card from the opponent before combat.
    Scout,
    /// Opponent's total is reduced by two in combats on tunnels.
    Disarm,
}

impl Faction {
    /// All factions in home-base order.
    pub const ALL: [Faction; 5] = [
        Faction::Nordic,
        Faction::Rusviet,
        Faction::Polania,
        Faction::Crimea,
        Faction::Saxony,
    ];

    /// Stable index of the faction (0..5).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The faction's home base space.
    #[must_use]
    pub const fn home(self) -> SpaceId {
        SpaceId::home(self.index())
    }

    /// Power at game start.
    #[must_use]
    pub const fn starting_power(self) -> u8 {
        match self {
            Faction::Nordic => 4,
            Faction::Rusviet => 3,
            Faction::Polania => 2,
            Faction::Crimea => 5,
            Faction::Saxony => 1,
        }
    }

    /// Combat cards drawn at game start.
    #[must_use]
    pub const fn starting_cards(self) -> u8 {
        match self {
            Faction::Nordic => 1,
            Faction::Rusviet => 2,
            Faction::Polania => 3,
            Faction::Crimea => 0,
            Faction::Saxony => 4,
        }
    }

    /// Mech abilities in slot order.
    #[must_use]
    pub const fn mech_abilities(self) -> [MechAbility; 4] {
        use MechAbility::*;
        match self {
            Faction::Nordic => [Riverwalk, Seaworthy, Artillery, Speed],
            Faction::Rusviet => [Riverwalk, Township, PeoplesArmy, Speed],
            Faction::Polania => [Riverwalk, Submerge, Camaraderie, Speed],
            Faction::Crimea => [Riverwalk, Wayfare, Scout, Speed],
            Faction::Saxony => [Riverwalk, Underpass, Disarm, Speed],
        }
    }

    /// Terrains a Riverwalk mech may enter across a river.
    #[must_use]
    pub const fn riverwalk_terrains(self) -> [Terrain; 2] {
        match self {
            Faction::Nordic => [Terrain::Forest, Terrain::Mountain],
            Faction::Rusviet => [Terrain::Farm, Terrain::Village],
            Faction::Polania => [Terrain::Village, Terrain::Mountain],
            Faction::Crimea => [Terrain::Farm, Terrain::Tundra],
            Faction::Saxony => [Terrain::Forest, Terrain::Mountain],
        }
    }

    /// Workers cross rivers.
    #[must_use]
    pub const fn workers_swim(self) -> bool {
        matches!(self, Faction::Nordic)
    }

    /// May choose the same mat section on consecutive turns.
    #[must_use]
    pub const fn may_repeat_section(self) -> bool {
        matches!(self, Faction::Rusviet)
    }

    /// May substitute one combat card for one missing resource per turn.
    #[must_use]
    pub const fn is_flexible_payer(self) -> bool {
        matches!(self, Faction::Crimea)
    }

    /// Winning combat never costs popularity for retreated workers.
    #[must_use]
    pub const fn ignores_worker_penalty(self) -> bool {
        matches!(self, Faction::Polania)
    }

    /// Maximum number of combat stars, `None` when unlimited.
    #[must_use]
    pub const fn combat_star_limit(self) -> Option<u8> {
        match self {
            Faction::Saxony => None,
            _ => Some(2),
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
