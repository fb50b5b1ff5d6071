//! Game configuration types.
//!
//! A game is configured once at setup by a `GameConfig`: which faction and
//! player mat sits at each seat, the turn ceiling, the structure bonus
//! scoring rule, and the seed used for deck shuffles.

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PlayerMap};
use crate::game::{Faction, MatKind};
use crate::rules::StructureBonus;

/// How much the interpreter and searches report through `log`.
///
/// Passed explicitly to every call that may log; there is no global level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verbosity {
    /// Nothing is logged. Used for search rollouts.
    #[default]
    Silent,
    /// Turn boundaries, combats and game results.
    Turns,
    /// Every applied action.
    Actions,
}

impl Verbosity {
    /// Whether turn-level events are reported.
    #[must_use]
    pub fn turns(self) -> bool {
        self >= Verbosity::Turns
    }

    /// Whether individual actions are reported.
    #[must_use]
    pub fn actions(self) -> bool {
        self >= Verbosity::Actions
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Faction at each seat. Must differ.
    pub factions: PlayerMap<Faction>,

    /// Player mat at each seat.
    pub mats: PlayerMap<MatKind>,

    /// Total player turns before the game is scored regardless of stars.
    pub turn_limit: u32,

    /// Structure bonus scoring rule used at finalisation.
    pub structure_bonus: StructureBonus,

    /// Seed for the combat deck and any derived randomness.
    pub seed: u64,
}

impl GameConfig {
    /// Create a config for two factions with default mats and rules.
    ///
    /// Panics if both seats are given the same faction.
    #[must_use]
    pub fn new(first: Faction, second: Faction) -> Self {
        assert_ne!(first, second, "Factions must differ");
        Self {
            factions: PlayerMap::new(|p| if p.index() == 0 { first } else { second }),
            mats: PlayerMap::new(|p| {
                if p.index() == 0 {
                    MatKind::Industrial
                } else {
                    MatKind::Engineering
                }
            }),
            turn_limit: 200,
            structure_bonus: StructureBonus::AdjacentTunnels,
            seed: 42,
        }
    }

    /// Set the mat for both seats.
    pub fn with_mats(mut self, first: MatKind, second: MatKind) -> Self {
        self.mats[PlayerId::new(0)] = first;
        self.mats[PlayerId::new(1)] = second;
        self
    }

    /// Set the turn ceiling.
    pub fn with_turn_limit(mut self, turns: u32) -> Self {
        self.turn_limit = turns;
        self
    }

    /// Set the structure bonus rule.
    pub fn with_structure_bonus(mut self, bonus: StructureBonus) -> Self {
        self.structure_bonus = bonus;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Faction::Nordic, Faction::Rusviet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.factions[PlayerId::new(0)], Faction::Nordic);
        assert_eq!(config.factions[PlayerId::new(1)], Faction::Rusviet);
        assert_eq!(config.turn_limit, 200);
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::new(Faction::Crimea, Faction::Saxony)
            .with_mats(MatKind::Patriotic, MatKind::Mechanical)
            .with_turn_limit(30)
            .with_structure_bonus(StructureBonus::LongestRow)
            .with_seed(7);

        assert_eq!(config.mats[PlayerId::new(0)], MatKind::Patriotic);
        assert_eq!(config.turn_limit, 30);
        assert_eq!(config.structure_bonus, StructureBonus::LongestRow);
        assert_eq!(config.seed, 7);
    }

    #[test]
    #[should_panic]
    fn test_same_faction_rejected() {
        let _ = GameConfig::new(Faction::Polania, Faction::Polania);
    }

    #[test]
    fn test_verbosity_levels() {
        assert!(!Verbosity::Silent.turns());
        assert!(Verbosity::Turns.turns());
        assert!(!Verbosity::Turns.actions());
        assert!(Verbosity::Actions.actions());
    }

    #[test]
    fn test_serialization() {
        let config = GameConfig::default().with_seed(99);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
