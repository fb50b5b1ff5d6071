//! Player mats: four sections, each a top action paired with a bottom action.
//!
//! ## Sections
//!
//! A turn picks one section (by index) and performs its top action, then
//! optionally pays for its bottom action. The bottom row is always Upgrade,
//! Deploy, Build, Enlist; mats differ in the order of the top row, in
//! starting popularity and coins, and in the coin reward each bottom
//! action pays.
//!
//! ## Costs
//!
//! Bottom actions cost a single resource type. Upgrades lower one bottom
//! cost by one, never below its minimum.

use serde::{Deserialize, Serialize};

use super::resources::Resource;

/// Top-row actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TopAction {
    /// Move units, or gain coins instead.
    MoveGain,
    Trade,
    Bolster,
    Produce,
}

/// Bottom-row actions, in mat order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BottomAction {
    Upgrade,
    Deploy,
    Build,
    Enlist,
}

impl BottomAction {
    pub const ALL: [BottomAction; 4] = [
        BottomAction::Upgrade,
        BottomAction::Deploy,
        BottomAction::Build,
        BottomAction::Enlist,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// The resource this action is paid with.
    #[must_use]
    pub const fn resource(self) -> Resource {
        match self {
            BottomAction::Upgrade => Resource::Oil,
            BottomAction::Deploy => Resource::Metal,
            BottomAction::Build => Resource::Wood,
            BottomAction::Enlist => Resource::Food,
        }
    }

    /// Cost before any upgrade.
    #[must_use]
    pub const fn base_cost(self) -> u8 {
        match self {
            BottomAction::Upgrade => 3,
            BottomAction::Deploy => 3,
            BottomAction::Build => 3,
            BottomAction::Enlist => 4,
        }
    }

    /// Lowest cost reachable by upgrades.
    #[must_use]
    pub const fn min_cost(self) -> u8 {
        match self {
            BottomAction::Upgrade => 2,
            BottomAction::Deploy => 1,
            BottomAction::Build => 2,
            BottomAction::Enlist => 2,
        }
    }
}

/// Top-row improvements gained by the Upgrade action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TopUpgrade {
    /// Move three units instead of two.
    MoveUnits,
    /// Gain two coins instead of one.
    GainCoins,
    /// Trade for two popularity instead of one.
    TradePopularity,
    /// Bolster for three power instead of two.
    BolsterPower,
    /// Bolster for two combat cards instead of one.
    BolsterCards,
    /// Produce on three spaces instead of two.
    ProduceSpaces,
}

impl TopUpgrade {
    pub const ALL: [TopUpgrade; 6] = [
        TopUpgrade::MoveUnits,
        TopUpgrade::GainCoins,
        TopUpgrade::TradePopularity,
        TopUpgrade::BolsterPower,
        TopUpgrade::BolsterCards,
        TopUpgrade::ProduceSpaces,
    ];

    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }
}

/// One-time bonuses taken when enlisting a recruit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnlistBonus {
    Power,
    Coins,
    Popularity,
    CombatCards,
}

impl EnlistBonus {
    pub const ALL: [EnlistBonus; 4] = [
        EnlistBonus::Power,
        EnlistBonus::Coins,
        EnlistBonus::Popularity,
        EnlistBonus::CombatCards,
    ];

    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }
}

/// The five player mats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatKind {
    Industrial,
    Engineering,
    Patriotic,
    Mechanical,
    Agricultural,
}

impl MatKind {
    /// Number of sections on every mat.
    pub const SECTIONS: u8 = 4;

    /// Top action of each section. The bottom action of section `i` is
    /// `BottomAction::ALL[i]`.
    #[must_use]
    pub const fn top_row(self) -> [TopAction; 4] {
        use TopAction::*;
        match self {
            MatKind::Industrial => [Bolster, Produce, MoveGain, Trade],
            MatKind::Engineering => [Produce, Trade, Bolster, MoveGain],
            MatKind::Patriotic => [MoveGain, Bolster, Trade, Produce],
            MatKind::Mechanical => [Trade, Bolster, MoveGain, Produce],
            MatKind::Agricultural => [MoveGain, Trade, Produce, Bolster],
        }
    }

    /// The `(top, bottom)` pair of a section.
    #[must_use]
    pub fn section(self, index: u8) -> (TopAction, BottomAction) {
        let i = usize::from(index) % 4;
        (self.top_row()[i], BottomAction::ALL[i])
    }

    #[must_use]
    pub const fn starting_popularity(self) -> u8 {
        match self {
            MatKind::Industrial | MatKind::Engineering | MatKind::Patriotic => 2,
            MatKind::Mechanical => 3,
            MatKind::Agricultural => 4,
        }
    }

    #[must_use]
    pub const fn starting_coins(self) -> u8 {
        match self {
            MatKind::Industrial => 4,
            MatKind::Engineering => 5,
            MatKind::Patriotic => 6,
            MatKind::Mechanical => 6,
            MatKind::Agricultural => 7,
        }
    }

    /// Coins paid for performing a bottom action.
    #[must_use]
    pub const fn bottom_reward(self, action: BottomAction) -> u8 {
        let rewards = match self {
            MatKind::Industrial => [3, 2, 1, 0],
            MatKind::Engineering => [2, 0, 3, 1],
            MatKind::Patriotic => [1, 3, 0, 2],
            MatKind::Mechanical => [0, 2, 2, 1],
            MatKind::Agricultural => [2, 1, 0, 3],
        };
        rewards[action.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mat_has_each_top_action_once() {
        for mat in [
            MatKind::Industrial,
            MatKind::Engineering,
            MatKind::Patriotic,
            MatKind::Mechanical,
            MatKind::Agricultural,
        ] {
            let mut row = mat.top_row().to_vec();
            row.sort();
            assert_eq!(
                row,
                vec![TopAction::MoveGain, TopAction::Trade, TopAction::Bolster, TopAction::Produce]
            );
        }
    }

    #[test]
    fn test_costs_can_be_upgraded() {
        for action in BottomAction::ALL {
            assert!(action.base_cost() > action.min_cost());
        }
    }

    #[test]
    fn test_section_pairs() {
        assert_eq!(
            MatKind::Industrial.section(2),
            (TopAction::MoveGain, BottomAction::Build)
        );
        assert_eq!(BottomAction::from_index(4), None);
    }
}
