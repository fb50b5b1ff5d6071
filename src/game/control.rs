//! Control queries.
//!
//! A seat controls a grid space when only its units are there, or, with no
//! units present at all, when its structure is there. Home bases are never
//! controlled. Control is derived from the board on demand and never stored.

use crate::board::{SpaceId, Terrain};
use crate::core::PlayerId;

use super::piece::PieceKind;
use super::resources::{Resource, Resources};
use super::state::GameState;

impl GameState {
    /// Seat controlling `space`, if any.
    #[must_use]
    pub fn controller(&self, space: SpaceId) -> Option<PlayerId> {
        if space.is_home() {
            return None;
        }
        let mut unit_owner = None;
        let mut structure_owner = None;
        for piece in self.occupants(space) {
            let seat = self.seat_of(piece.faction)?;
            if piece.is_unit() {
                match unit_owner {
                    Some(owner) if owner != seat => return None,
                    _ => unit_owner = Some(seat),
                }
            } else {
                structure_owner = Some(seat);
            }
        }
        unit_owner.or(structure_owner)
    }

    /// Spaces controlled by `seat`, in id order.
    #[must_use]
    pub fn controlled_spaces(&self, seat: PlayerId) -> Vec<SpaceId> {
        self.occupied_spaces()
            .filter(|&s| self.controller(s) == Some(seat))
            .collect()
    }

    /// Resources on spaces controlled by `seat`.
    #[must_use]
    pub fn controlled_resources(&self, seat: PlayerId) -> Resources {
        let mut total = Resources::EMPTY;
        for (space, here) in self.resource_spaces() {
            if self.controller(space) == Some(seat) {
                total.add(here);
            }
        }
        total
    }

    /// Controlled spaces holding at least one unit of `resource`.
    #[must_use]
    pub fn spaces_with_resource(&self, seat: PlayerId, resource: Resource) -> Vec<SpaceId> {
        self.resource_spaces()
            .filter(|&(s, r)| r[resource] > 0 && self.controller(s) == Some(seat))
            .map(|(s, _)| s)
            .collect()
    }

    /// Territories for scoring; the factory counts as three.
    #[must_use]
    pub fn territory_count(&self, seat: PlayerId) -> u32 {
        self.controlled_spaces(seat)
            .into_iter()
            .map(|s| if self.board().terrain(s) == Terrain::Factory { 3 } else { 1 })
            .sum()
    }

    /// Grid spaces holding at least one of `seat`'s workers, in id order.
    #[must_use]
    pub fn worker_spaces(&self, seat: PlayerId) -> Vec<SpaceId> {
        let faction = self.faction_of(seat);
        let mut spaces: Vec<_> = self
            .pieces_of(faction, PieceKind::Worker)
            .map(|(_, s)| s)
            .filter(|s| !s.is_home())
            .collect();
        spaces.sort_unstable();
        spaces.dedup();
        spaces
    }

    /// Workers `seat` has on grid spaces.
    #[must_use]
    pub fn workers_on_board(&self, seat: PlayerId) -> usize {
        let faction = self.faction_of(seat);
        self.pieces_of(faction, PieceKind::Worker)
            .filter(|(_, s)| !s.is_home())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::game::{Faction, PieceKey, Structure};

    #[test]
    fn test_units_control() {
        let state = GameState::new(GameConfig::default());
        let nordic = PlayerId::new(0);
        let exit = state.board().exits(Faction::Nordic)[0];
        assert_eq!(state.controller(exit), Some(nordic));
        assert_eq!(state.controller(Faction::Nordic.home()), None);
        assert_eq!(state.controlled_spaces(nordic).len(), 2);
    }

    #[test]
    fn test_structure_controls_empty_space_only() {
        let mut state = GameState::new(GameConfig::default());
        let (nordic, rusviet) = (PlayerId::new(0), PlayerId::new(1));
        let space = SpaceId::grid(3, 2);

        state.place_piece(PieceKey::structure(Faction::Nordic, Structure::Mill), space);
        assert_eq!(state.controller(space), Some(nordic));

        state.place_piece(PieceKey::worker(Faction::Rusviet, 0), space);
        assert_eq!(state.controller(space), Some(rusviet));
    }

    #[test]
    fn test_contested_space_has_no_controller() {
        let mut state = GameState::new(GameConfig::default());
        let space = SpaceId::grid(3, 2);
        state.place_piece(PieceKey::character(Faction::Nordic), space);
        state.place_piece(PieceKey::character(Faction::Rusviet), space);
        assert_eq!(state.controller(space), None);
    }

    #[test]
    fn test_controlled_resources_and_factory() {
        let mut state = GameState::new(GameConfig::default());
        let nordic = PlayerId::new(0);
        let exit = state.board().exits(Faction::Nordic)[0];
        let factory = state.board().factory();

        state.add_resources(exit, Resources::of(Resource::Oil, 2));
        state.add_resources(SpaceId::grid(5, 5), Resources::of(Resource::Oil, 4));
        assert_eq!(state.controlled_resources(nordic)[Resource::Oil], 2);
        assert_eq!(state.spaces_with_resource(nordic, Resource::Oil), vec![exit]);

        state.place_piece(PieceKey::character(Faction::Nordic), factory);
        assert_eq!(state.territory_count(nordic), 5);
    }
}
