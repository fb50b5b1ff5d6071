//! Per-player movement tables.
//!
//! The base board says which spaces touch; an `Adjacency` says where a
//! particular player's units may step. It layers the faction's unlocked
//! mech abilities and its mine (if built) on top of the base edges, with
//! separate tables for workers and for mechs/the character.
//!
//! ## Rules
//!
//! - Lakes are closed to every unit unless Seaworthy or Submerge is unlocked
//!   (mechs and the character only).
//! - A river blocks an edge unless Riverwalk reaches the destination terrain
//!   (mechs and the character) or the faction's workers swim.
//! - Township joins villages and the factory; Underpass joins mountains and
//!   tunnels; Submerge joins all lakes.
//! - Wayfare lets mechs and the character move to their own home base or any
//!   home base of a faction not in the game.
//! - A mine joins every tunnel and the mine's space for all the owner's units.
//!
//! Speed (two steps) is a property of movement, not of the table; see
//! `actions::movement`.
//!
//! Tables are rebuilt when a mech is deployed or a mine is built and are
//! shared between states through an `Arc`.

use smallvec::SmallVec;

use super::map::{BoardMap, SpaceId, Terrain, GRID_SPACES, TOTAL_SPACES};
use crate::game::{Faction, MechAbility, PieceKind};

type Edges = SmallVec<[SpaceId; 8]>;

/// Movement tables for one player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Adjacency {
    faction: Faction,
    mech: Vec<Edges>,
    worker: Vec<Edges>,
}

impl Adjacency {
    /// Build the tables for `faction`.
    ///
    /// `abilities` are the unlocked mech abilities, `mine` the space of the
    /// faction's mine if built, and `active` the factions in the game (for
    /// Wayfare's inactive home bases).
    #[must_use]
    pub fn build(
        board: &BoardMap,
        faction: Faction,
        abilities: &[MechAbility],
        mine: Option<SpaceId>,
        active: &[Faction],
    ) -> Self {
        let has = |a: MechAbility| abilities.contains(&a);
        let lake_access = has(MechAbility::Seaworthy) || has(MechAbility::Submerge);
        let riverwalk = faction.riverwalk_terrains();

        let mut mech = vec![Edges::new(); TOTAL_SPACES];
        let mut worker = vec![Edges::new(); TOTAL_SPACES];

        for space in board.spaces() {
            let from = space.id;
            for &to in board.neighbours(from) {
                let lake_edge =
                    board.terrain(from) == Terrain::Lake || board.terrain(to) == Terrain::Lake;
                let river = board.river_between(from, to);

                let mech_ok = if lake_edge {
                    lake_access
                } else if river {
                    has(MechAbility::Riverwalk) && riverwalk.contains(&board.terrain(to))
                } else {
                    true
                };
                let worker_ok = !lake_edge && (!river || faction.workers_swim());

                if mech_ok {
                    mech[from.index()].push(to);
                }
                if worker_ok {
                    worker[from.index()].push(to);
                }
            }
        }

        if has(MechAbility::Submerge) {
            let lakes: Vec<_> = board.spaces_of(Terrain::Lake).collect();
            join_all(&mut mech, &lakes);
        }
        if has(MechAbility::Township) {
            let factory = board.factory();
            for village in board.spaces_of(Terrain::Village) {
                link(&mut mech, village, factory);
                link(&mut mech, factory, village);
            }
        }
        if has(MechAbility::Underpass) {
            let group: Vec<_> = board
                .spaces_of(Terrain::Mountain)
                .chain(board.tunnels())
                .collect();
            join_all(&mut mech, &group);
        }
        if has(MechAbility::Wayfare) {
            let homes: Vec<_> = Faction::ALL
                .iter()
                .filter(|&&f| f == faction || !active.contains(&f))
                .map(|f| f.home())
                .collect();
            for from in 0..GRID_SPACES as u8 {
                for &home in &homes {
                    link(&mut mech, SpaceId(from), home);
                }
            }
        }
        if let Some(mine) = mine {
            let group: Vec<_> = board.tunnels().chain(std::iter::once(mine)).collect();
            join_all(&mut mech, &group);
            join_all(&mut worker, &group);
        }

        for edges in mech.iter_mut().chain(worker.iter_mut()) {
            edges.sort_unstable();
            edges.dedup();
        }

        Self {
            faction,
            mech,
            worker,
        }
    }

    /// Faction the tables belong to.
    #[must_use]
    pub fn faction(&self) -> Faction {
        self.faction
    }

    /// Spaces a unit of `kind` may step to from `from`, sorted.
    #[must_use]
    pub fn neighbours(&self, from: SpaceId, kind: PieceKind) -> &[SpaceId] {
        match kind {
            PieceKind::Worker => &self.worker[from.index()],
            PieceKind::Mech | PieceKind::Character => &self.mech[from.index()],
            PieceKind::Structure => &[],
        }
    }
}

fn link(table: &mut [Edges], from: SpaceId, to: SpaceId) {
    if from != to {
        table[from.index()].push(to);
    }
}

fn join_all(table: &mut [Edges], group: &[SpaceId]) {
    for &a in group {
        for &b in group {
            link(table, a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(faction: Faction, abilities: &[MechAbility]) -> Adjacency {
        let board = BoardMap::standard();
        Adjacency::build(&board, faction, abilities, None, &[faction, Faction::Saxony])
    }

    #[test]
    fn test_river_blocks_without_abilities() {
        let adj = table(Faction::Rusviet, &[]);
        let (a, b) = (SpaceId::grid(2, 0), SpaceId::grid(3, 0));
        assert!(!adj.neighbours(a, PieceKind::Mech).contains(&b));
        assert!(!adj.neighbours(a, PieceKind::Worker).contains(&b));
    }

    #[test]
    fn test_riverwalk_reaches_faction_terrain() {
        // (4,4) farm -> (4,5) village across a river; Rusviet riverwalks to villages.
        let adj = table(Faction::Rusviet, &[MechAbility::Riverwalk]);
        let (farm, village) = (SpaceId::grid(4, 4), SpaceId::grid(4, 5));
        assert!(adj.neighbours(farm, PieceKind::Mech).contains(&village));
        assert!(!adj.neighbours(farm, PieceKind::Worker).contains(&village));
    }

    #[test]
    fn test_nordic_workers_swim() {
        let adj = table(Faction::Nordic, &[]);
        let (a, b) = (SpaceId::grid(2, 0), SpaceId::grid(3, 0));
        assert!(adj.neighbours(a, PieceKind::Worker).contains(&b));
        assert!(!adj.neighbours(a, PieceKind::Mech).contains(&b));
    }

    #[test]
    fn test_lakes_need_abilities() {
        let lake = SpaceId::grid(3, 4);
        let shore = SpaceId::grid(3, 3);

        let plain = table(Faction::Nordic, &[]);
        assert!(!plain.neighbours(shore, PieceKind::Mech).contains(&lake));

        let seaworthy = table(Faction::Nordic, &[MechAbility::Seaworthy]);
        assert!(seaworthy.neighbours(shore, PieceKind::Mech).contains(&lake));
        assert!(!seaworthy.neighbours(shore, PieceKind::Worker).contains(&lake));
    }

    #[test]
    fn test_submerge_joins_lakes() {
        let adj = table(Faction::Polania, &[MechAbility::Submerge]);
        let (a, b) = (SpaceId::grid(0, 2), SpaceId::grid(6, 3));
        assert!(adj.neighbours(a, PieceKind::Mech).contains(&b));
    }

    #[test]
    fn test_township_and_underpass() {
        let board = BoardMap::standard();
        let township = table(Faction::Rusviet, &[MechAbility::Township]);
        let village = SpaceId::grid(0, 4);
        assert!(township
            .neighbours(village, PieceKind::Mech)
            .contains(&board.factory()));

        let underpass = table(Faction::Saxony, &[MechAbility::Underpass]);
        let (mountain, tunnel) = (SpaceId::grid(0, 0), SpaceId::grid(4, 4));
        assert!(underpass.neighbours(mountain, PieceKind::Mech).contains(&tunnel));
        assert!(!underpass.neighbours(mountain, PieceKind::Worker).contains(&tunnel));
    }

    #[test]
    fn test_wayfare_reaches_inactive_homes_only() {
        let adj = table(Faction::Crimea, &[MechAbility::Wayfare]);
        let from = SpaceId::grid(3, 3);
        let edges = adj.neighbours(from, PieceKind::Mech);
        assert!(edges.contains(&Faction::Crimea.home()));
        assert!(edges.contains(&Faction::Nordic.home()));
        assert!(!edges.contains(&Faction::Saxony.home()));
    }

    #[test]
    fn test_mine_connects_tunnels_for_workers() {
        let board = BoardMap::standard();
        let mine = SpaceId::grid(0, 0);
        let adj = Adjacency::build(&board, Faction::Saxony, &[], Some(mine), &[Faction::Saxony]);
        assert!(adj
            .neighbours(mine, PieceKind::Worker)
            .contains(&SpaceId::grid(4, 4)));
        assert!(adj
            .neighbours(SpaceId::grid(1, 3), PieceKind::Worker)
            .contains(&mine));
    }

    #[test]
    fn test_home_base_is_exit_only() {
        let adj = table(Faction::Nordic, &[]);
        let home = Faction::Nordic.home();
        assert_eq!(adj.neighbours(home, PieceKind::Worker).len(), 2);
        for &exit in adj.neighbours(home, PieceKind::Mech) {
            assert!(!adj.neighbours(exit, PieceKind::Mech).contains(&home));
        }
    }
}
