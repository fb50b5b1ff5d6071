//! Move/Gain and unit movement.
//!
//! ## Protocol
//!
//! Choosing Move pushes `ChooseMover` (once per unit the player may move)
//! above a single `CheckCombat`. Each chosen unit then runs:
//!
//! 1. `CarryWorker`: mechs pick up the owner's unmoved workers, one at a time
//! 2. `CarryResource`: any unit picks up resources from its space
//! 3. `ChooseDestination`
//! 4. `MovePiece`: relocates the unit and its cargo together
//!
//! Steps with nothing to offer are skipped. A mech is not offered workers
//! when every space it could reach is a lake.
//!
//! ## Destinations
//!
//! One step along the owner's movement table; with Speed unlocked, mechs
//! and the character may take a second step from a space with no enemy
//! units. Workers never enter a space holding enemy units. A mech carrying
//! workers never ends on a lake.
//!
//! A mech or character entering a space held only by enemy workers sends
//! those workers home, costing one popularity each unless Camaraderie is
//! unlocked.

use smallvec::SmallVec;
use std::collections::BTreeSet;

use crate::board::{SpaceId, Terrain};
use crate::core::PlayerId;
use crate::game::{
    GameMove, GameState, MechAbility, PieceKey, PieceKind, Resources,
};

use super::{Action, Choice, StateChange};

/// Workers and resources travelling with a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cargo {
    pub workers: SmallVec<[PieceKey; 4]>,
    pub resources: Resources,
}

// =============================================================================
// Move / Gain
// =============================================================================

/// `true` (move) when some unit can move, `false` (gain coins) always.
#[must_use]
pub fn move_gain_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    if movable_units(state, player).is_empty() {
        vec![GameMove::Bool(false)]
    } else {
        vec![GameMove::Bool(true), GameMove::Bool(false)]
    }
}

pub fn move_gain(mut state: GameState, player: PlayerId, mv: GameMove) -> GameState {
    match mv {
        GameMove::Bool(true) => {
            let remaining = state.player(player).move_units();
            state.push(StateChange::CheckCombat { attacker: player }.into());
            state.push(Choice::ChooseMover { player, remaining }.into());
        }
        GameMove::Bool(false) => {
            let amount = state.player(player).gain_coins();
            state.push(StateChange::GainCoins { player, amount }.into());
        }
        _ => {}
    }
    state
}

// =============================================================================
// Unit selection and cargo
// =============================================================================

/// Units that have not moved this turn and have somewhere to go.
#[must_use]
pub fn movable_units(state: &GameState, player: PlayerId) -> Vec<PieceKey> {
    let faction = state.faction_of(player);
    state
        .pieces()
        .filter(|(k, _)| k.faction == faction && k.is_unit() && !state.has_moved(*k))
        .filter(|&(k, from)| !destinations(state, player, k, from, &Cargo::default()).is_empty())
        .map(|(k, _)| k)
        .collect()
}

/// `Pass` plus every movable unit.
#[must_use]
pub fn mover_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    std::iter::once(GameMove::Pass)
        .chain(movable_units(state, player).into_iter().map(GameMove::Piece))
        .collect()
}

pub fn choose_mover(
    mut state: GameState,
    player: PlayerId,
    remaining: u8,
    mv: GameMove,
) -> GameState {
    let GameMove::Piece(piece) = mv else {
        return state;
    };
    let Some(from) = state.location(piece) else {
        return state;
    };
    state.mark_moved(piece);
    if remaining > 1 {
        state.push(
            Choice::ChooseMover {
                player,
                remaining: remaining - 1,
            }
            .into(),
        );
    }
    let step = first_step(&state, player, piece, from, Cargo::default());
    state.push(step);
    state
}

fn first_step(state: &GameState, player: PlayerId, piece: PieceKey, from: SpaceId, cargo: Cargo) -> Action {
    if piece.kind != PieceKind::Mech {
        return resource_step(state, player, piece, from, cargo);
    }
    let options = carry_worker_options(state, player, from, &cargo);
    let worker = options.iter().find_map(|mv| match mv {
        GameMove::Piece(worker) => Some(*worker),
        _ => None,
    });
    match worker {
        Some(worker) if lands_loaded(state, player, piece, from, &cargo, worker) => {
            Choice::CarryWorker { player, piece, from, cargo }.into()
        }
        _ => resource_step(state, player, piece, from, cargo),
    }
}

/// Whether the mech keeps a destination once `worker` is aboard.
fn lands_loaded(
    state: &GameState,
    player: PlayerId,
    piece: PieceKey,
    from: SpaceId,
    cargo: &Cargo,
    worker: PieceKey,
) -> bool {
    if !cargo.workers.is_empty() {
        return true;
    }
    let mut loaded = cargo.clone();
    loaded.workers.push(worker);
    !destinations(state, player, piece, from, &loaded).is_empty()
}

fn resource_step(state: &GameState, player: PlayerId, piece: PieceKey, from: SpaceId, cargo: Cargo) -> Action {
    if carry_resource_options(state, from, &cargo).len() > 1 {
        Choice::CarryResource { player, piece, from, cargo }.into()
    } else {
        Choice::ChooseDestination { player, piece, from, cargo }.into()
    }
}

/// `Pass` plus the owner's unmoved workers on `from` not yet aboard.
#[must_use]
pub fn carry_worker_options(
    state: &GameState,
    player: PlayerId,
    from: SpaceId,
    cargo: &Cargo,
) -> Vec<GameMove> {
    let faction = state.faction_of(player);
    std::iter::once(GameMove::Pass)
        .chain(
            state
                .units_at(from, faction)
                .filter(|k| {
                    k.kind == PieceKind::Worker && !state.has_moved(*k) && !cargo.workers.contains(k)
                })
                .map(GameMove::Piece),
        )
        .collect()
}

pub fn carry_worker(
    mut state: GameState,
    player: PlayerId,
    piece: PieceKey,
    from: SpaceId,
    mut cargo: Cargo,
    mv: GameMove,
) -> GameState {
    let next = match mv {
        GameMove::Piece(worker) => {
            state.mark_moved(worker);
            cargo.workers.push(worker);
            first_step(&state, player, piece, from, cargo)
        }
        _ => resource_step(&state, player, piece, from, cargo),
    };
    state.push(next);
    state
}

/// `Pass` plus each resource type still on `from` beyond what is aboard.
#[must_use]
pub fn carry_resource_options(state: &GameState, from: SpaceId, cargo: &Cargo) -> Vec<GameMove> {
    let here = state.resources_at(from);
    std::iter::once(GameMove::Pass)
        .chain(
            here.iter()
                .filter(|&(r, n)| n > cargo.resources[r])
                .map(|(r, _)| GameMove::Resource(r)),
        )
        .collect()
}

pub fn carry_resource(
    mut state: GameState,
    player: PlayerId,
    piece: PieceKey,
    from: SpaceId,
    mut cargo: Cargo,
    mv: GameMove,
) -> GameState {
    let next = match mv {
        GameMove::Resource(resource) => {
            cargo.resources[resource] += 1;
            resource_step(&state, player, piece, from, cargo)
        }
        _ => Choice::ChooseDestination { player, piece, from, cargo }.into(),
    };
    state.push(next);
    state
}

// =============================================================================
// Destinations
// =============================================================================

/// Spaces `piece` may move to from `from`, sorted.
#[must_use]
pub fn destinations(
    state: &GameState,
    player: PlayerId,
    piece: PieceKey,
    from: SpaceId,
    cargo: &Cargo,
) -> Vec<SpaceId> {
    let owner = state.player(player);
    let faction = owner.faction;
    let table = &owner.adjacency;
    let speed = piece.is_plastic() && owner.has_ability(MechAbility::Speed);

    let mut found = BTreeSet::new();
    for &first in table.neighbours(from, piece.kind) {
        let enemies = state.has_enemy_units(first, faction);
        if piece.kind == PieceKind::Worker && enemies {
            continue;
        }
        found.insert(first);
        if speed && !enemies {
            for &second in table.neighbours(first, piece.kind) {
                if second != from {
                    found.insert(second);
                }
            }
        }
    }

    let board = state.board();
    found
        .into_iter()
        .filter(|&s| cargo.workers.is_empty() || board.terrain(s) != Terrain::Lake)
        .collect()
}

pub fn choose_destination(
    mut state: GameState,
    player: PlayerId,
    piece: PieceKey,
    cargo: Cargo,
    mv: GameMove,
) -> GameState {
    if let GameMove::Space(to) = mv {
        state.push(StateChange::MovePiece { player, piece, to, cargo }.into());
    }
    state
}

/// Relocate a unit with its cargo and displace lone enemy workers.
pub fn move_piece(
    mut state: GameState,
    player: PlayerId,
    piece: PieceKey,
    to: SpaceId,
    cargo: &Cargo,
) -> GameState {
    let Some(from) = state.location(piece) else {
        return state;
    };
    state.place_piece(piece, to);
    for &worker in &cargo.workers {
        state.place_piece(worker, to);
    }
    if !cargo.resources.is_empty() {
        state.remove_resources(from, cargo.resources);
        state.add_resources(to, cargo.resources);
    }

    let faction = state.faction_of(player);
    if piece.is_plastic() && !to.is_home() && !state.has_enemy_plastic(to, faction) {
        let displaced: Vec<PieceKey> = state
            .occupants(to)
            .filter(|k| k.faction != faction && k.kind == PieceKind::Worker)
            .collect();
        for &worker in &displaced {
            state.place_piece(worker, worker.faction.home());
        }
        if !displaced.is_empty() && !state.player(player).has_ability(MechAbility::Camaraderie) {
            state.player_mut(player).lose_popularity(u8::try_from(displaced.len()).unwrap_or(u8::MAX));
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::game::{Faction, Resource};

    fn setup() -> (GameState, PlayerId) {
        let mut state = GameState::new(GameConfig::default());
        while state.top().is_some() {
            state.pop();
        }
        (state, PlayerId::new(0))
    }

    #[test]
    fn test_initial_movers() {
        let (state, p) = setup();
        let units = movable_units(&state, p);
        assert!(units.contains(&PieceKey::character(Faction::Nordic)));
        assert!(units.contains(&PieceKey::worker(Faction::Nordic, 0)));
        assert_eq!(mover_options(&state, p)[0], GameMove::Pass);
    }

    #[test]
    fn test_character_leaves_home_by_exits() {
        let (state, p) = setup();
        let character = PieceKey::character(Faction::Nordic);
        let home = Faction::Nordic.home();
        let dests = destinations(&state, p, character, home, &Cargo::default());
        assert_eq!(dests, vec![SpaceId::grid(0, 3), SpaceId::grid(0, 4)]);
    }

    #[test]
    fn test_speed_adds_second_step() {
        let (mut state, p) = setup();
        let mech = PieceKey::mech(Faction::Nordic, 3);
        let from = SpaceId::grid(3, 3);
        state.place_piece(mech, from);
        state.player_mut(p).mechs.insert(3);
        state.rebuild_adjacency(p);

        let dests = destinations(&state, p, mech, from, &Cargo::default());
        assert!(dests.contains(&SpaceId::grid(3, 1)));
        assert!(!dests.contains(&from));
    }

    #[test]
    fn test_workers_avoid_enemies() {
        let (mut state, p) = setup();
        let worker = PieceKey::worker(Faction::Nordic, 1);
        let from = SpaceId::grid(0, 4);
        state.place_piece(PieceKey::worker(Faction::Rusviet, 0), SpaceId::grid(0, 5));
        let dests = destinations(&state, p, worker, from, &Cargo::default());
        assert!(!dests.contains(&SpaceId::grid(0, 5)));
        assert!(dests.contains(&SpaceId::grid(1, 4)));
    }

    #[test]
    fn test_move_carries_cargo() {
        let (mut state, p) = setup();
        let mech = PieceKey::mech(Faction::Nordic, 0);
        let worker = PieceKey::worker(Faction::Nordic, 1);
        let from = SpaceId::grid(0, 4);
        let to = SpaceId::grid(1, 4);
        state.place_piece(mech, from);
        state.add_resources(from, Resources::of(Resource::Oil, 3));

        let mut cargo = Cargo::default();
        cargo.workers.push(worker);
        cargo.resources[Resource::Oil] = 2;
        let state = move_piece(state, p, mech, to, &cargo);
        state.assert_bookkeeping();

        assert_eq!(state.location(mech), Some(to));
        assert_eq!(state.location(worker), Some(to));
        assert_eq!(state.resources_at(to)[Resource::Oil], 2);
        assert_eq!(state.resources_at(from)[Resource::Oil], 1);
    }

    #[test]
    fn test_displacing_workers_costs_popularity() {
        let (mut state, p) = setup();
        let character = PieceKey::character(Faction::Nordic);
        let enemy = PieceKey::worker(Faction::Rusviet, 0);
        let to = SpaceId::grid(1, 4);
        state.place_piece(enemy, to);
        let popularity = state.player(p).popularity;

        let state = move_piece(state, p, character, to, &Cargo::default());
        state.assert_bookkeeping();
        assert_eq!(state.location(enemy), Some(Faction::Rusviet.home()));
        assert_eq!(state.player(p).popularity, popularity - 1);
    }

    #[test]
    fn test_loaded_mech_always_has_a_landing() {
        let (state, _) = setup();
        let land: Vec<SpaceId> = state
            .board()
            .grid()
            .filter(|s| s.terrain != Terrain::Lake)
            .map(|s| s.id)
            .collect();
        let mech = PieceKey::mech(Faction::Nordic, 1);
        let worker = PieceKey::worker(Faction::Nordic, 0);

        for from in land {
            let (mut state, p) = setup();
            state.player_mut(p).mechs.insert(1);
            state.rebuild_adjacency(p);
            state.place_piece(mech, from);
            state.place_piece(worker, from);

            let mut state = choose_mover(state, p, 1, GameMove::Piece(mech));
            assert_eq!(state.top().map(Action::name), Some("CarryWorker"), "at {from}");
            let Some(Action::Choice(Choice::CarryWorker { cargo, .. })) = state.pop() else {
                panic!("expected CarryWorker at {from}");
            };
            let mut state = carry_worker(state, p, mech, from, cargo, GameMove::Piece(worker));
            loop {
                match state.pop() {
                    Some(Action::Choice(Choice::CarryWorker { cargo, .. })) => {
                        state = carry_worker(state, p, mech, from, cargo, GameMove::Pass);
                    }
                    Some(Action::Choice(Choice::CarryResource { cargo, .. })) => {
                        state = carry_resource(state, p, mech, from, cargo, GameMove::Pass);
                    }
                    Some(Action::Choice(Choice::ChooseDestination { cargo, .. })) => {
                        assert!(cargo.workers.contains(&worker));
                        let dests = destinations(&state, p, mech, from, &cargo);
                        assert!(!dests.is_empty(), "no landing from {from}");
                        let board = state.board();
                        assert!(dests.iter().all(|&s| board.terrain(s) != Terrain::Lake));
                        break;
                    }
                    other => panic!("unexpected {:?} at {from}", other.as_ref().map(Action::name)),
                }
            }
        }
    }

    #[test]
    fn test_mover_chain() {
        let (mut state, p) = setup();
        let mech = PieceKey::mech(Faction::Nordic, 0);
        let from = SpaceId::grid(0, 4);
        state.place_piece(mech, from);
        state.player_mut(p).mechs.insert(0);

        let state = choose_mover(state, p, 2, GameMove::Piece(mech));
        assert!(state.has_moved(mech));
        assert_eq!(state.top().map(Action::name), Some("CarryWorker"));
        assert_eq!(state.stack().len(), 2);

        let state = {
            let mut state = state;
            let Some(Action::Choice(Choice::CarryWorker { cargo, .. })) = state.pop() else {
                panic!("expected CarryWorker");
            };
            carry_worker(state, p, mech, from, cargo, GameMove::Pass)
        };
        assert_eq!(state.top().map(Action::name), Some("ChooseDestination"));
    }
}
