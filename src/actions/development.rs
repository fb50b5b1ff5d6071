//! Bottom-row actions: Upgrade, Deploy, Build, Enlist.

use crate::board::{SpaceId, Terrain};
use crate::core::PlayerId;
use crate::game::{
    BottomAction, EnlistBonus, GameMove, GameState, PieceKey, Structure, TopUpgrade,
};

use super::{Choice, StateChange};

/// Mech slots per faction.
const MECH_SLOTS: u8 = 4;

// =============================================================================
// Upgrade
// =============================================================================

/// Top upgrades not yet taken, provided some bottom cost can still drop.
#[must_use]
pub fn top_upgrade_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    let p = state.player(player);
    if !BottomAction::ALL.iter().any(|&b| p.can_reduce(b)) {
        return Vec::new();
    }
    TopUpgrade::ALL
        .iter()
        .enumerate()
        .filter(|(_, u)| !p.has_upgrade(**u))
        .map(|(i, _)| GameMove::Int(i as u8))
        .collect()
}

pub fn choose_top_upgrade(mut state: GameState, player: PlayerId, mv: GameMove) -> GameState {
    if let Some(top) = int_of(mv).and_then(TopUpgrade::from_index) {
        state.push(Choice::ChooseBottomUpgrade { player, top }.into());
    }
    state
}

#[must_use]
pub fn bottom_upgrade_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    let p = state.player(player);
    BottomAction::ALL
        .iter()
        .filter(|&&b| p.can_reduce(b))
        .map(|b| GameMove::Int(b.index() as u8))
        .collect()
}

pub fn choose_bottom_upgrade(
    mut state: GameState,
    player: PlayerId,
    top: TopUpgrade,
    mv: GameMove,
) -> GameState {
    if let Some(bottom) = int_of(mv).and_then(BottomAction::from_index) {
        state.push(StateChange::ApplyUpgrade { player, top, bottom }.into());
    }
    state
}

/// Unlock `top` and lower the price of `bottom` by one.
pub fn apply_upgrade(
    mut state: GameState,
    player: PlayerId,
    top: TopUpgrade,
    bottom: BottomAction,
) -> GameState {
    let p = state.player_mut(player);
    assert!(!p.has_upgrade(top), "{top:?} already upgraded");
    assert!(p.can_reduce(bottom), "{bottom:?} already at minimum cost");
    p.upgrades.insert(top);
    p.bottom_costs[bottom.index()] -= 1;
    state
}

// =============================================================================
// Deploy
// =============================================================================

/// Undeployed mech slots, provided there is a worker to deploy on.
#[must_use]
pub fn mech_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    if state.worker_spaces(player).is_empty() {
        return Vec::new();
    }
    let p = state.player(player);
    (0..MECH_SLOTS)
        .filter(|slot| !p.mechs.contains(slot))
        .map(GameMove::Int)
        .collect()
}

pub fn choose_mech(mut state: GameState, player: PlayerId, mv: GameMove) -> GameState {
    if let Some(slot) = int_of(mv).filter(|&s| s < MECH_SLOTS) {
        state.push(Choice::ChooseDeploySpace { player, slot }.into());
    }
    state
}

#[must_use]
pub fn deploy_space_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    state
        .worker_spaces(player)
        .into_iter()
        .map(GameMove::Space)
        .collect()
}

pub fn choose_deploy_space(
    mut state: GameState,
    player: PlayerId,
    slot: u8,
    mv: GameMove,
) -> GameState {
    if let GameMove::Space(space) = mv {
        state.push(StateChange::DeployMech { player, slot, space }.into());
    }
    state
}

/// Place a mech and unlock its ability.
pub fn deploy_mech(mut state: GameState, player: PlayerId, slot: u8, space: SpaceId) -> GameState {
    let faction = state.faction_of(player);
    let p = state.player_mut(player);
    assert!(!p.mechs.contains(&slot), "mech {slot} already deployed");
    p.mechs.insert(slot);
    state.place_piece(PieceKey::mech(faction, slot), space);
    state.rebuild_adjacency(player);
    state
}

// =============================================================================
// Build
// =============================================================================

/// Worker spaces without a structure, excluding the factory.
#[must_use]
pub fn build_spaces(state: &GameState, player: PlayerId) -> Vec<SpaceId> {
    let board = state.board();
    state
        .worker_spaces(player)
        .into_iter()
        .filter(|&s| {
            state.structure_at(s).is_none()
                && !matches!(board.terrain(s), Terrain::Factory | Terrain::Lake)
        })
        .collect()
}

#[must_use]
pub fn structure_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    if build_spaces(state, player).is_empty() {
        return Vec::new();
    }
    let p = state.player(player);
    Structure::ALL
        .into_iter()
        .filter(|s| !p.structures.contains(s))
        .map(GameMove::Structure)
        .collect()
}

pub fn choose_structure(mut state: GameState, player: PlayerId, mv: GameMove) -> GameState {
    if let GameMove::Structure(structure) = mv {
        state.push(Choice::ChooseBuildSpace { player, structure }.into());
    }
    state
}

#[must_use]
pub fn build_space_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    build_spaces(state, player)
        .into_iter()
        .map(GameMove::Space)
        .collect()
}

pub fn choose_build_space(
    mut state: GameState,
    player: PlayerId,
    structure: Structure,
    mv: GameMove,
) -> GameState {
    if let GameMove::Space(space) = mv {
        state.push(StateChange::BuildStructure { player, structure, space }.into());
    }
    state
}

/// Place a structure. A mine joins its space to the tunnel network.
pub fn build_structure(
    mut state: GameState,
    player: PlayerId,
    structure: Structure,
    space: SpaceId,
) -> GameState {
    assert!(state.structure_at(space).is_none(), "{space} already has a structure");
    let faction = state.faction_of(player);
    state.player_mut(player).structures.insert(structure);
    state.place_piece(PieceKey::structure(faction, structure), space);
    if structure == Structure::Mine {
        state.rebuild_adjacency(player);
    }
    state
}

// =============================================================================
// Enlist
// =============================================================================

/// Bottom actions without a recruit.
#[must_use]
pub fn recruit_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    let p = state.player(player);
    BottomAction::ALL
        .iter()
        .filter(|&&b| !p.recruits.contains(&b))
        .map(|b| GameMove::Int(b.index() as u8))
        .collect()
}

pub fn choose_recruit(mut state: GameState, player: PlayerId, mv: GameMove) -> GameState {
    if let Some(recruit) = int_of(mv).and_then(BottomAction::from_index) {
        state.push(Choice::ChooseEnlistBonus { player, recruit }.into());
    }
    state
}

#[must_use]
pub fn enlist_bonus_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    let p = state.player(player);
    EnlistBonus::ALL
        .iter()
        .enumerate()
        .filter(|(_, b)| !p.enlist_bonuses.contains(*b))
        .map(|(i, _)| GameMove::Int(i as u8))
        .collect()
}

pub fn choose_enlist_bonus(
    mut state: GameState,
    player: PlayerId,
    recruit: BottomAction,
    mv: GameMove,
) -> GameState {
    if let Some(bonus) = int_of(mv).and_then(EnlistBonus::from_index) {
        state.push(StateChange::Enlist { player, recruit, bonus }.into());
    }
    state
}

/// Place a recruit and collect its one-time bonus.
pub fn enlist(
    mut state: GameState,
    player: PlayerId,
    recruit: BottomAction,
    bonus: EnlistBonus,
) -> GameState {
    let p = state.player_mut(player);
    assert!(!p.recruits.contains(&recruit), "{recruit:?} already has a recruit");
    assert!(!p.enlist_bonuses.contains(&bonus), "{bonus:?} already taken");
    p.recruits.insert(recruit);
    p.enlist_bonuses.insert(bonus);
    match bonus {
        EnlistBonus::Power => p.gain_power(2),
        EnlistBonus::Coins => p.coins += 2,
        EnlistBonus::Popularity => p.gain_popularity(2),
        EnlistBonus::CombatCards => state.draw_cards(player, 2),
    }
    state
}

// =============================================================================
// Rewards
// =============================================================================

/// Coins printed on the mat for taking `action`.
pub fn bottom_reward(mut state: GameState, player: PlayerId, action: BottomAction) -> GameState {
    let p = state.player_mut(player);
    p.coins += u32::from(p.mat.bottom_reward(action));
    state
}

/// Every seat with a recruit under `action` collects its ongoing bonus.
pub fn recruit_bonuses(mut state: GameState, action: BottomAction) -> GameState {
    for seat in PlayerId::both() {
        if !state.player(seat).recruits.contains(&action) {
            continue;
        }
        let p = state.player_mut(seat);
        match action {
            BottomAction::Upgrade => p.gain_power(1),
            BottomAction::Deploy => p.coins += 1,
            BottomAction::Build => p.gain_popularity(1),
            BottomAction::Enlist => state.draw_cards(seat, 1),
        }
    }
    state
}

fn int_of(mv: GameMove) -> Option<u8> {
    match mv {
        GameMove::Int(i) => Some(i),
        _ => None,
    }
}
