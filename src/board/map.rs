//! Static board geometry.
//!
//! The board is a 7×7 offset hex grid (odd rows shifted right) plus five
//! off-grid home bases, one per faction. Spaces are numbered row-major:
//! grid space `(r, c)` is `SpaceId(r * 7 + c)`, home bases follow at
//! `49..54` in faction order.
//!
//! ## Edges
//!
//! - Base adjacency is hex adjacency between grid spaces.
//! - Some edges are crossed by a river; those block movement unless a
//!   faction ability says otherwise (see `adjacency`).
//! - Each home base has two exits. Units may leave a home base but never
//!   enter one by ordinary movement.
//!
//! The map is built once and shared by every state through an `Arc`.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::game::{Faction, Resource};

/// Grid rows.
pub const ROWS: u8 = 7;
/// Grid columns.
pub const COLS: u8 = 7;
/// Number of grid spaces.
pub const GRID_SPACES: usize = (ROWS as usize) * (COLS as usize);
/// Number of spaces including home bases.
pub const TOTAL_SPACES: usize = GRID_SPACES + Faction::ALL.len();

/// Space identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpaceId(pub u8);

impl SpaceId {
    /// Grid space at `(row, col)`.
    #[must_use]
    pub const fn grid(row: u8, col: u8) -> Self {
        assert!(row < ROWS && col < COLS, "grid coordinate out of range");
        Self(row * COLS + col)
    }

    /// Home base of the faction with index `faction`.
    #[must_use]
    pub const fn home(faction: usize) -> Self {
        Self((GRID_SPACES + faction) as u8)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn is_home(self) -> bool {
        self.index() >= GRID_SPACES
    }

    /// `(row, col)` for grid spaces.
    #[must_use]
    pub const fn coords(self) -> Option<(u8, u8)> {
        if self.is_home() {
            None
        } else {
            Some((self.0 / COLS, self.0 % COLS))
        }
    }
}

impl std::fmt::Display for SpaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.coords() {
            Some((r, c)) => write!(f, "({r},{c})"),
            None => write!(f, "home{}", self.index() - GRID_SPACES),
        }
    }
}

/// Terrain types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Farm,
    Village,
    Forest,
    Mountain,
    Tundra,
    Lake,
    Factory,
    HomeBase,
}

impl Terrain {
    /// Resource produced by workers on this terrain.
    #[must_use]
    pub const fn produces(self) -> Option<Resource> {
        match self {
            Terrain::Farm => Some(Resource::Food),
            Terrain::Forest => Some(Resource::Wood),
            Terrain::Mountain => Some(Resource::Metal),
            Terrain::Tundra => Some(Resource::Oil),
            _ => None,
        }
    }

    /// Whether Produce does anything here (villages produce workers).
    #[must_use]
    pub const fn is_productive(self) -> bool {
        self.produces().is_some() || matches!(self, Terrain::Village)
    }
}

/// A single board space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Space {
    pub id: SpaceId,
    pub terrain: Terrain,
    pub tunnel: bool,
    pub encounter: bool,
    /// Owning faction for home bases.
    pub home_of: Option<Faction>,
}

const TERRAIN_GRID: [&str; ROWS as usize] = [
    "mwltvfm",
    "fvtwmlt",
    "wlmfvtw",
    "tfvXlwm",
    "vmwtfvl",
    "ltfmwmf",
    "mvwltfv",
];

const TUNNELS: [(u8, u8); 5] = [(1, 3), (2, 2), (3, 5), (4, 1), (4, 4)];

const ENCOUNTERS: [(u8, u8); 6] = [(0, 3), (2, 4), (4, 2), (6, 4), (3, 1), (5, 5)];

const RIVERS: [((u8, u8), (u8, u8)); 10] = [
    ((2, 0), (3, 0)),
    ((2, 1), (3, 0)),
    ((2, 1), (3, 1)),
    ((2, 2), (3, 1)),
    ((2, 2), (3, 2)),
    ((4, 4), (4, 5)),
    ((4, 4), (5, 4)),
    ((5, 3), (5, 4)),
    ((5, 4), (6, 4)),
    ((6, 4), (6, 5)),
];

/// Home exits in faction order.
const HOME_EXITS: [[(u8, u8); 2]; 5] = [
    [(0, 3), (0, 4)],
    [(2, 6), (3, 6)],
    [(2, 0), (3, 0)],
    [(6, 1), (6, 2)],
    [(6, 5), (6, 6)],
];

/// The standard board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardMap {
    spaces: Vec<Space>,
    neighbours: Vec<SmallVec<[SpaceId; 6]>>,
    rivers: FxHashSet<(SpaceId, SpaceId)>,
}

impl BoardMap {
    /// Build the standard board.
    #[must_use]
    pub fn standard() -> Self {
        let mut spaces = Vec::with_capacity(TOTAL_SPACES);
        for (r, row) in TERRAIN_GRID.iter().enumerate() {
            for (c, symbol) in row.bytes().enumerate() {
                let (r, c) = (r as u8, c as u8);
                spaces.push(Space {
                    id: SpaceId::grid(r, c),
                    terrain: terrain_from_symbol(symbol),
                    tunnel: TUNNELS.contains(&(r, c)),
                    encounter: ENCOUNTERS.contains(&(r, c)),
                    home_of: None,
                });
            }
        }
        for faction in Faction::ALL {
            spaces.push(Space {
                id: faction.home(),
                terrain: Terrain::HomeBase,
                tunnel: false,
                encounter: false,
                home_of: Some(faction),
            });
        }

        let mut neighbours: Vec<SmallVec<[SpaceId; 6]>> = vec![SmallVec::new(); TOTAL_SPACES];
        for space in 0..GRID_SPACES as u8 {
            let id = SpaceId(space);
            neighbours[id.index()] = grid_neighbours(id).collect();
        }
        for faction in Faction::ALL {
            neighbours[faction.home().index()] = HOME_EXITS[faction.index()]
                .iter()
                .map(|&(r, c)| SpaceId::grid(r, c))
                .collect();
        }

        let mut rivers = FxHashSet::default();
        for &((r1, c1), (r2, c2)) in &RIVERS {
            let (a, b) = (SpaceId::grid(r1, c1), SpaceId::grid(r2, c2));
            rivers.insert((a, b));
            rivers.insert((b, a));
        }

        Self {
            spaces,
            neighbours,
            rivers,
        }
    }

    #[must_use]
    pub fn space(&self, id: SpaceId) -> &Space {
        &self.spaces[id.index()]
    }

    #[must_use]
    pub fn terrain(&self, id: SpaceId) -> Terrain {
        self.space(id).terrain
    }

    #[must_use]
    pub fn is_tunnel(&self, id: SpaceId) -> bool {
        self.space(id).tunnel
    }

    /// Every space, home bases last.
    pub fn spaces(&self) -> impl Iterator<Item = &Space> {
        self.spaces.iter()
    }

    /// Grid spaces only.
    pub fn grid(&self) -> impl Iterator<Item = &Space> {
        self.spaces[..GRID_SPACES].iter()
    }

    /// Base adjacency, ignoring rivers and abilities.
    ///
    /// For a home base these are its exits; no grid space lists a home base.
    #[must_use]
    pub fn neighbours(&self, id: SpaceId) -> &[SpaceId] {
        &self.neighbours[id.index()]
    }

    /// Whether a river separates two adjacent spaces.
    #[must_use]
    pub fn river_between(&self, a: SpaceId, b: SpaceId) -> bool {
        self.rivers.contains(&(a, b))
    }

    /// The factory space.
    #[must_use]
    pub fn factory(&self) -> SpaceId {
        SpaceId::grid(3, 3)
    }

    /// Grid spaces of the given terrain.
    pub fn spaces_of(&self, terrain: Terrain) -> impl Iterator<Item = SpaceId> + '_ {
        self.grid()
            .filter(move |s| s.terrain == terrain)
            .map(|s| s.id)
    }

    /// Tunnel spaces.
    pub fn tunnels(&self) -> impl Iterator<Item = SpaceId> + '_ {
        self.grid().filter(|s| s.tunnel).map(|s| s.id)
    }

    /// Exits of a faction's home base.
    #[must_use]
    pub fn exits(&self, faction: Faction) -> &[SpaceId] {
        self.neighbours(faction.home())
    }
}

impl Default for BoardMap {
    fn default() -> Self {
        Self::standard()
    }
}

fn terrain_from_symbol(symbol: u8) -> Terrain {
    match symbol {
        b'f' => Terrain::Farm,
        b'v' => Terrain::Village,
        b'w' => Terrain::Forest,
        b'm' => Terrain::Mountain,
        b't' => Terrain::Tundra,
        b'l' => Terrain::Lake,
        b'X' => Terrain::Factory,
        other => panic!("unknown terrain symbol {}", other as char),
    }
}

/// Hex neighbours of a grid space; odd rows are shifted right.
fn grid_neighbours(id: SpaceId) -> impl Iterator<Item = SpaceId> {
    let (r, c) = id.coords().unwrap_or((0, 0));
    let (r, c) = (i16::from(r), i16::from(c));
    let shift = if r % 2 == 0 { -1 } else { 0 };
    let offsets = [
        (-1, shift),
        (-1, shift + 1),
        (0, -1),
        (0, 1),
        (1, shift),
        (1, shift + 1),
    ];
    offsets.into_iter().filter_map(move |(dr, dc)| {
        let (nr, nc) = (r + dr, c + dc);
        let in_bounds = (0..i16::from(ROWS)).contains(&nr) && (0..i16::from(COLS)).contains(&nc);
        in_bounds.then(|| SpaceId::grid(nr as u8, nc as u8))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_numbering() {
        assert_eq!(SpaceId::grid(3, 3), SpaceId(24));
        assert_eq!(SpaceId(24).coords(), Some((3, 3)));
        assert_eq!(SpaceId::home(0), SpaceId(49));
        assert!(SpaceId::home(4).is_home());
        assert_eq!(SpaceId::home(2).coords(), None);
    }

    #[test]
    fn test_adjacency_is_symmetric_on_grid() {
        let board = BoardMap::standard();
        for space in board.grid() {
            for &n in board.neighbours(space.id) {
                assert!(
                    board.neighbours(n).contains(&space.id),
                    "{} -> {} not symmetric",
                    space.id,
                    n
                );
            }
        }
    }

    #[test]
    fn test_corner_and_centre_degrees() {
        let board = BoardMap::standard();
        assert_eq!(board.neighbours(SpaceId::grid(3, 3)).len(), 6);
        assert_eq!(board.neighbours(SpaceId::grid(0, 0)).len(), 2);
    }

    #[test]
    fn test_rivers_join_adjacent_spaces() {
        let board = BoardMap::standard();
        for &((r1, c1), (r2, c2)) in &RIVERS {
            let (a, b) = (SpaceId::grid(r1, c1), SpaceId::grid(r2, c2));
            assert!(board.neighbours(a).contains(&b));
            assert!(board.river_between(a, b));
            assert!(board.river_between(b, a));
        }
    }

    #[test]
    fn test_home_exits_are_land() {
        let board = BoardMap::standard();
        for faction in Faction::ALL {
            let exits = board.exits(faction);
            assert_eq!(exits.len(), 2);
            for &exit in exits {
                assert!(!exit.is_home());
                assert_ne!(board.terrain(exit), Terrain::Lake);
            }
        }
    }

    #[test]
    fn test_no_grid_space_leads_home() {
        let board = BoardMap::standard();
        for space in board.grid() {
            assert!(board.neighbours(space.id).iter().all(|n| !n.is_home()));
        }
    }

    #[test]
    fn test_board_features() {
        let board = BoardMap::standard();
        assert_eq!(board.terrain(board.factory()), Terrain::Factory);
        assert_eq!(board.tunnels().count(), 5);
        assert_eq!(board.spaces_of(Terrain::Lake).count(), 7);
        assert_eq!(board.spaces().count(), TOTAL_SPACES);
    }
}
