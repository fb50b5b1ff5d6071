//! Per-seat player records.
//!
//! ## Player
//!
//! Everything a seat owns that is not a board location: faction and mat,
//! the coin/popularity/power tracks, the combat-card hand, mat upgrades,
//! stars, which workers/mechs/structures/recruits exist, and the movement
//! table derived from unlocked abilities.
//!
//! ## Stars
//!
//! Milestones. Most are one-shot flags; combat stars are counted. The
//! sixth star ends the game.

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

use super::cost::Cost;
use super::faction::{Faction, MechAbility};
use super::mat::{BottomAction, EnlistBonus, MatKind, TopUpgrade};
use super::piece::Structure;
use crate::board::Adjacency;

/// Stars needed to end the game.
pub const STAR_LIMIT: u8 = 6;
/// Top of the popularity track.
pub const MAX_POPULARITY: u8 = 18;
/// Top of the power track.
pub const MAX_POWER: u8 = 16;
/// Workers a faction can have on the board.
pub const MAX_WORKERS: u8 = 8;
/// Workers each faction starts with.
pub const STARTING_WORKERS: u8 = 2;

/// Kinds of star.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StarKind {
    Upgrades,
    Mechs,
    Structures,
    Recruits,
    Workers,
    Popularity,
    Power,
    Combat,
}

/// Stars achieved by one player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stars {
    pub upgrades: bool,
    pub mechs: bool,
    pub structures: bool,
    pub recruits: bool,
    pub workers: bool,
    pub popularity: bool,
    pub power: bool,
    pub combat: u8,
}

impl Stars {
    /// Total stars placed.
    #[must_use]
    pub fn count(&self) -> u8 {
        let flags = [
            self.upgrades,
            self.mechs,
            self.structures,
            self.recruits,
            self.workers,
            self.popularity,
            self.power,
        ];
        flags.iter().filter(|&&f| f).count() as u8 + self.combat
    }

    #[must_use]
    pub fn has(&self, kind: StarKind) -> bool {
        match kind {
            StarKind::Upgrades => self.upgrades,
            StarKind::Mechs => self.mechs,
            StarKind::Structures => self.structures,
            StarKind::Recruits => self.recruits,
            StarKind::Workers => self.workers,
            StarKind::Popularity => self.popularity,
            StarKind::Power => self.power,
            StarKind::Combat => self.combat > 0,
        }
    }

    /// Place a star. Flags are idempotent; combat stars accumulate.
    pub fn place(&mut self, kind: StarKind) {
        match kind {
            StarKind::Upgrades => self.upgrades = true,
            StarKind::Mechs => self.mechs = true,
            StarKind::Structures => self.structures = true,
            StarKind::Recruits => self.recruits = true,
            StarKind::Workers => self.workers = true,
            StarKind::Popularity => self.popularity = true,
            StarKind::Power => self.power = true,
            StarKind::Combat => self.combat += 1,
        }
    }
}

/// A seat's record.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub faction: Faction,
    pub mat: MatKind,
    pub coins: u32,
    pub popularity: u8,
    pub power: u8,
    /// Combat card values (2..=5), in draw order.
    pub hand: Vector<u8>,
    pub upgrades: OrdSet<TopUpgrade>,
    /// Current resource cost of each bottom action, in mat order.
    pub bottom_costs: [u8; 4],
    pub stars: Stars,
    /// Ids of workers on the board.
    pub workers: OrdSet<u8>,
    /// Slots of deployed mechs.
    pub mechs: OrdSet<u8>,
    pub structures: OrdSet<Structure>,
    /// Recruits enlisted, identified by the bottom action they sit under.
    pub recruits: OrdSet<BottomAction>,
    pub enlist_bonuses: OrdSet<EnlistBonus>,
    /// Section chosen on the previous turn.
    pub last_section: Option<u8>,
    pub adjacency: Arc<Adjacency>,
}

impl Player {
    /// Starting record. The hand is dealt by `GameState::new`.
    #[must_use]
    pub fn new(faction: Faction, mat: MatKind, adjacency: Arc<Adjacency>) -> Self {
        Self {
            faction,
            mat,
            coins: u32::from(mat.starting_coins()),
            popularity: mat.starting_popularity(),
            power: faction.starting_power(),
            hand: Vector::new(),
            upgrades: OrdSet::new(),
            bottom_costs: BottomAction::ALL.map(BottomAction::base_cost),
            stars: Stars::default(),
            workers: OrdSet::new(),
            mechs: OrdSet::new(),
            structures: OrdSet::new(),
            recruits: OrdSet::new(),
            enlist_bonuses: OrdSet::new(),
            last_section: None,
            adjacency,
        }
    }

    #[must_use]
    pub fn has_upgrade(&self, upgrade: TopUpgrade) -> bool {
        self.upgrades.contains(&upgrade)
    }

    /// Mech abilities unlocked by deployed mechs.
    #[must_use]
    pub fn abilities(&self) -> SmallVec<[MechAbility; 4]> {
        let table = self.faction.mech_abilities();
        self.mechs.iter().map(|&slot| table[usize::from(slot)]).collect()
    }

    #[must_use]
    pub fn has_ability(&self, ability: MechAbility) -> bool {
        self.abilities().contains(&ability)
    }

    /// Current price of a bottom action.
    #[must_use]
    pub fn bottom_cost(&self, action: BottomAction) -> Cost {
        Cost::resource(action.resource(), self.bottom_costs[action.index()])
    }

    /// Whether a bottom action's cost can still be lowered.
    #[must_use]
    pub fn can_reduce(&self, action: BottomAction) -> bool {
        self.bottom_costs[action.index()] > action.min_cost()
    }

    /// Units moved by the Move action.
    #[must_use]
    pub fn move_units(&self) -> u8 {
        self.upgraded(TopUpgrade::MoveUnits, 2, 3)
    }

    /// Coins from the Gain alternative to moving.
    #[must_use]
    pub fn gain_coins(&self) -> u8 {
        self.upgraded(TopUpgrade::GainCoins, 1, 2)
    }

    #[must_use]
    pub fn trade_popularity(&self) -> u8 {
        self.upgraded(TopUpgrade::TradePopularity, 1, 2)
    }

    #[must_use]
    pub fn bolster_power(&self) -> u8 {
        self.upgraded(TopUpgrade::BolsterPower, 2, 3)
    }

    #[must_use]
    pub fn bolster_cards(&self) -> u8 {
        self.upgraded(TopUpgrade::BolsterCards, 1, 2)
    }

    #[must_use]
    pub fn produce_spaces(&self) -> u8 {
        self.upgraded(TopUpgrade::ProduceSpaces, 2, 3)
    }

    fn upgraded(&self, upgrade: TopUpgrade, base: u8, improved: u8) -> u8 {
        if self.has_upgrade(upgrade) {
            improved
        } else {
            base
        }
    }

    pub fn gain_popularity(&mut self, amount: u8) {
        self.popularity = self.popularity.saturating_add(amount).min(MAX_POPULARITY);
    }

    pub fn lose_popularity(&mut self, amount: u8) {
        self.popularity = self.popularity.saturating_sub(amount);
    }

    pub fn gain_power(&mut self, amount: u8) {
        self.power = self.power.saturating_add(amount).min(MAX_POWER);
    }

    pub fn lose_power(&mut self, amount: u8) {
        self.power = self.power.saturating_sub(amount);
    }

    /// Combat cards in hand.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.hand.len()
    }

    /// Remove one card of the given value. Returns false if none was held.
    pub fn remove_card(&mut self, value: u8) -> bool {
        match self.hand.iter().position(|&v| v == value) {
            Some(i) => {
                self.hand.remove(i);
                true
            }
            None => false,
        }
    }

    /// Remove up to `count` of the lowest cards, returning them.
    pub fn take_lowest_cards(&mut self, count: u8) -> SmallVec<[u8; 4]> {
        let mut taken = SmallVec::new();
        for _ in 0..count {
            let Some(&lowest) = self.hand.iter().min() else {
                break;
            };
            self.remove_card(lowest);
            taken.push(lowest);
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardMap;

    fn player(faction: Faction) -> Player {
        let board = BoardMap::standard();
        let adjacency = Arc::new(Adjacency::build(&board, faction, &[], None, &[faction]));
        Player::new(faction, MatKind::Industrial, adjacency)
    }

    #[test]
    fn test_starting_values() {
        let p = player(Faction::Crimea);
        assert_eq!(p.power, 5);
        assert_eq!(p.popularity, 2);
        assert_eq!(p.coins, 4);
        assert_eq!(p.stars.count(), 0);
        assert_eq!(p.bottom_cost(BottomAction::Enlist).resource_amount(crate::game::Resource::Food), 4);
    }

    #[test]
    fn test_tracks_are_capped() {
        let mut p = player(Faction::Nordic);
        p.gain_popularity(30);
        p.gain_power(30);
        assert_eq!(p.popularity, MAX_POPULARITY);
        assert_eq!(p.power, MAX_POWER);
        p.lose_power(40);
        assert_eq!(p.power, 0);
    }

    #[test]
    fn test_upgrades_raise_amounts() {
        let mut p = player(Faction::Nordic);
        assert_eq!(p.move_units(), 2);
        p.upgrades.insert(TopUpgrade::MoveUnits);
        assert_eq!(p.move_units(), 3);
    }

    #[test]
    fn test_abilities_follow_slots() {
        let mut p = player(Faction::Saxony);
        p.mechs.insert(1);
        p.mechs.insert(2);
        assert_eq!(
            p.abilities().as_slice(),
            &[MechAbility::Underpass, MechAbility::Disarm]
        );
        assert!(!p.has_ability(MechAbility::Riverwalk));
    }

    #[test]
    fn test_take_lowest_cards() {
        let mut p = player(Faction::Nordic);
        p.hand = Vector::from(vec![5, 2, 4, 2]);
        let taken = p.take_lowest_cards(3);
        assert_eq!(taken.as_slice(), &[2, 2, 4]);
        assert_eq!(p.hand, Vector::from(vec![5]));
    }

    #[test]
    fn test_stars() {
        let mut stars = Stars::default();
        stars.place(StarKind::Mechs);
        stars.place(StarKind::Mechs);
        stars.place(StarKind::Combat);
        stars.place(StarKind::Combat);
        assert_eq!(stars.count(), 3);
        assert!(stars.has(StarKind::Combat));
    }
}
