//! Resource types and fixed-size resource counters.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// The four produced resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    Oil,
    Metal,
    Wood,
    Food,
}

impl Resource {
    /// All resources in index order.
    pub const ALL: [Resource; 4] = [Resource::Oil, Resource::Metal, Resource::Wood, Resource::Food];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Count of each resource type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resources([u8; 4]);

impl Resources {
    /// No resources.
    pub const EMPTY: Resources = Resources([0; 4]);

    /// `amount` units of a single resource.
    #[must_use]
    pub fn of(resource: Resource, amount: u8) -> Self {
        let mut r = Self::EMPTY;
        r[resource] = amount;
        r
    }

    /// Total units across all types.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&n| u32::from(n)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// Non-zero entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Resource, u8)> + '_ {
        Resource::ALL
            .into_iter()
            .map(|r| (r, self[r]))
            .filter(|&(_, n)| n > 0)
    }

    /// Add every entry of `other`.
    pub fn add(&mut self, other: Resources) {
        for r in Resource::ALL {
            self[r] = self[r].saturating_add(other[r]);
        }
    }

    /// Subtract every entry of `other`, saturating at zero.
    pub fn remove(&mut self, other: Resources) {
        for r in Resource::ALL {
            self[r] = self[r].saturating_sub(other[r]);
        }
    }
}

impl Index<Resource> for Resources {
    type Output = u8;

    fn index(&self, resource: Resource) -> &u8 {
        &self.0[resource.index()]
    }
}

impl IndexMut<Resource> for Resources {
    fn index_mut(&mut self, resource: Resource) -> &mut u8 {
        &mut self.0[resource.index()]
    }
}
