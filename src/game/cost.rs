//! Structured action prices.

use serde::{Deserialize, Serialize};

use super::resources::{Resource, Resources};

/// The price of an action.
///
/// Resource costs are paid from resources on spaces the payer controls,
/// never from a personal inventory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cost {
    pub power: u8,
    pub popularity: u8,
    pub combat_cards: u8,
    pub coins: u8,
    pub resources: Resources,
}

impl Cost {
    /// A cost of nothing.
    pub const FREE: Cost = Cost {
        power: 0,
        popularity: 0,
        combat_cards: 0,
        coins: 0,
        resources: Resources::EMPTY,
    };

    #[must_use]
    pub fn coins(amount: u8) -> Self {
        Self { coins: amount, ..Self::FREE }
    }

    #[must_use]
    pub fn power(amount: u8) -> Self {
        Self { power: amount, ..Self::FREE }
    }

    #[must_use]
    pub fn resource(resource: Resource, amount: u8) -> Self {
        Self {
            resources: Resources::of(resource, amount),
            ..Self::FREE
        }
    }

    /// Nothing is owed.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.uses_no_resources()
            && self.power == 0
            && self.popularity == 0
            && self.combat_cards == 0
            && self.coins == 0
    }

    #[must_use]
    pub fn uses_no_resources(&self) -> bool {
        self.resources.is_empty()
    }

    /// Units of `resource` owed.
    #[must_use]
    pub fn resource_amount(&self, resource: Resource) -> u8 {
        self.resources[resource]
    }

    /// The same cost with one less unit of `resource` (saturating).
    #[must_use]
    pub fn reduce_by_1(mut self, resource: Resource) -> Self {
        self.resources[resource] = self.resources[resource].saturating_sub(1);
        self
    }
}
