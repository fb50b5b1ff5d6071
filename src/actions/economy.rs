//! Track changes, Trade and Produce.

use smallvec::SmallVec;

use crate::board::{SpaceId, Terrain};
use crate::core::PlayerId;
use crate::game::{GameMove, GameState, PieceKind, Resource, Resources, MAX_WORKERS};

use super::{Choice, StateChange};

pub fn gain_coins(mut state: GameState, player: PlayerId, amount: u8) -> GameState {
    state.player_mut(player).coins += u32::from(amount);
    state
}

pub fn gain_power(mut state: GameState, player: PlayerId, amount: u8) -> GameState {
    state.player_mut(player).gain_power(amount);
    state
}

pub fn lose_power(mut state: GameState, player: PlayerId, amount: u8) -> GameState {
    state.player_mut(player).lose_power(amount);
    state
}

pub fn gain_popularity(mut state: GameState, player: PlayerId, amount: u8) -> GameState {
    state.player_mut(player).gain_popularity(amount);
    state
}

pub fn draw_combat_cards(mut state: GameState, player: PlayerId, count: u8) -> GameState {
    state.draw_cards(player, count);
    state
}

// =============================================================================
// Trade
// =============================================================================

/// Any resource, provided there is a worker to receive it.
#[must_use]
pub fn trade_resource_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    if state.worker_spaces(player).is_empty() {
        Vec::new()
    } else {
        Resource::ALL.into_iter().map(GameMove::Resource).collect()
    }
}

pub fn choose_trade_resource(
    mut state: GameState,
    player: PlayerId,
    remaining: u8,
    mv: GameMove,
) -> GameState {
    if let GameMove::Resource(resource) = mv {
        if remaining > 1 {
            state.push(
                Choice::ChooseTradeResource {
                    player,
                    remaining: remaining - 1,
                }
                .into(),
            );
        }
        state.push(Choice::ChooseTradeSpace { player, resource }.into());
    }
    state
}

#[must_use]
pub fn trade_space_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    state
        .worker_spaces(player)
        .into_iter()
        .map(GameMove::Space)
        .collect()
}

pub fn choose_trade_space(mut state: GameState, resource: Resource, mv: GameMove) -> GameState {
    if let GameMove::Space(space) = mv {
        state.add_resources(space, Resources::of(resource, 1));
    }
    state
}

// =============================================================================
// Produce
// =============================================================================

/// `Pass` plus every worker space that would produce something and has not
/// been chosen yet.
#[must_use]
pub fn produce_space_options(
    state: &GameState,
    player: PlayerId,
    chosen: &[SpaceId],
) -> Vec<GameMove> {
    let at_cap = state.player(player).workers.len() >= usize::from(MAX_WORKERS);
    let mut options = vec![GameMove::Pass];
    for space in state.worker_spaces(player) {
        let terrain = state.board().terrain(space);
        let useful = terrain.is_productive() && !(terrain == Terrain::Village && at_cap);
        if useful && !chosen.contains(&space) {
            options.push(GameMove::Space(space));
        }
    }
    options
}

pub fn choose_produce_space(
    mut state: GameState,
    player: PlayerId,
    remaining: u8,
    mut chosen: SmallVec<[SpaceId; 3]>,
    mv: GameMove,
) -> GameState {
    if let GameMove::Space(space) = mv {
        if remaining > 1 {
            chosen.push(space);
            state.push(
                Choice::ChooseProduceSpace {
                    player,
                    remaining: remaining - 1,
                    chosen,
                }
                .into(),
            );
        }
        state.push(
            StateChange::ProduceOn {
                player,
                space,
                extra: 0,
            }
            .into(),
        );
    }
    state
}

/// One unit per worker (plus `extra`) of the space's resource; villages
/// produce workers instead, up to the cap.
pub fn produce_on(mut state: GameState, player: PlayerId, space: SpaceId, extra: u8) -> GameState {
    let faction = state.faction_of(player);
    let workers = state.units_at(space, faction).filter(|k| k.kind == PieceKind::Worker).count();
    let count = workers as u8 + extra;
    let terrain = state.board().terrain(space);

    if terrain == Terrain::Village {
        for _ in 0..count {
            if state.add_worker(player, space).is_none() {
                break;
            }
        }
    } else if let Some(resource) = terrain.produces() {
        state.add_resources(space, Resources::of(resource, count));
    }
    state
}
