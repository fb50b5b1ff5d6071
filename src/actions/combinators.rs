//! Composition of actions: Sequence, Boolean, Optional, MaybePayCost.

use crate::core::PlayerId;
use crate::game::{Cost, GameMove, GameState};
use crate::rules::payment::can_pay;

use super::{Action, StateChange};

/// Push `actions` so that the first one ends up on top.
pub fn sequence(mut state: GameState, actions: &[Action]) -> GameState {
    for action in actions.iter().rev() {
        state.push(action.clone());
    }
    state
}

/// `true` when the first branch can do something, `false` when the second
/// can. An unavailable pair still offers `false`.
#[must_use]
pub fn boolean_options(state: &GameState, yes: &Action, no: &Action) -> Vec<GameMove> {
    let mut options = Vec::with_capacity(2);
    if yes.is_available(state) {
        options.push(GameMove::Bool(true));
    }
    if no.is_available(state) || options.is_empty() {
        options.push(GameMove::Bool(false));
    }
    options
}

pub fn boolean(mut state: GameState, yes: &Action, no: &Action, mv: GameMove) -> GameState {
    match mv {
        GameMove::Bool(true) => state.push(yes.clone()),
        GameMove::Bool(false) => state.push(no.clone()),
        _ => {}
    }
    state
}

#[must_use]
pub fn optional_options(state: &GameState, action: &Action) -> Vec<GameMove> {
    if action.is_available(state) {
        vec![GameMove::Bool(true), GameMove::Bool(false)]
    } else {
        vec![GameMove::Bool(false)]
    }
}

pub fn optional(mut state: GameState, action: &Action, mv: GameMove) -> GameState {
    if mv == GameMove::Bool(true) {
        state.push(action.clone());
    }
    state
}

/// `true` only when the payer can afford the cost and the action would do
/// something. `false` is always legal.
#[must_use]
pub fn maybe_pay_options(
    state: &GameState,
    player: PlayerId,
    cost: &Cost,
    action: &Action,
) -> Vec<GameMove> {
    if can_pay(state, player, cost) && action.is_available(state) {
        vec![GameMove::Bool(true), GameMove::Bool(false)]
    } else {
        vec![GameMove::Bool(false)]
    }
}

/// On `true`, charge the cost and then run the action.
pub fn maybe_pay(
    mut state: GameState,
    player: PlayerId,
    cost: Cost,
    action: &Action,
    mv: GameMove,
) -> GameState {
    if mv == GameMove::Bool(true) {
        state.push(action.clone());
        state.push(StateChange::Charge { player, cost }.into());
    }
    state
}
