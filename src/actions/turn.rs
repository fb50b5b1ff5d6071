//! Taking a turn: pick a mat section, then run its top and bottom actions.

use smallvec::SmallVec;
use std::sync::Arc;

use crate::core::PlayerId;
use crate::game::{
    BottomAction, Cost, GameMove, GameState, MatKind, PieceKey, Structure, TopAction,
};

use super::{Action, Choice, StateChange};

/// Mat sections the player may pick. The previous section is excluded
/// unless the faction may repeat it.
#[must_use]
pub fn section_options(state: &GameState, player: PlayerId) -> Vec<GameMove> {
    let p = state.player(player);
    let blocked = if p.faction.may_repeat_section() {
        None
    } else {
        p.last_section
    };
    (0..MatKind::SECTIONS)
        .filter(|&i| Some(i) != blocked)
        .map(GameMove::Int)
        .collect()
}

pub fn take_turn(mut state: GameState, player: PlayerId, mv: GameMove) -> GameState {
    let GameMove::Int(section) = mv else {
        return state;
    };
    state.player_mut(player).last_section = Some(section);
    let (top, bottom) = state.player(player).mat.section(section);
    let turn = Action::sequence(vec![
        top_action(&state, player, top),
        bottom_action(&state, player, bottom),
    ]);
    state.push(turn);
    state
}

/// The top-row action, including any bonus from the structure in its column.
#[must_use]
pub fn top_action(state: &GameState, player: PlayerId, top: TopAction) -> Action {
    let p = state.player(player);
    let built = |s: Structure| p.structures.contains(&s);

    match top {
        TopAction::MoveGain => Choice::MoveGain { player }.into(),
        TopAction::Trade => {
            let mut steps = vec![Choice::Boolean {
                player,
                yes: Arc::new(Choice::ChooseTradeResource { player, remaining: 2 }.into()),
                no: Arc::new(
                    StateChange::GainPopularity {
                        player,
                        amount: p.trade_popularity(),
                    }
                    .into(),
                ),
            }
            .into()];
            if built(Structure::Monument) {
                steps.push(StateChange::GainPopularity { player, amount: 1 }.into());
            }
            Action::maybe_pay(player, Cost::coins(1), Action::sequence(steps))
        }
        TopAction::Bolster => {
            let mut steps = vec![Choice::Boolean {
                player,
                yes: Arc::new(
                    StateChange::GainPower {
                        player,
                        amount: p.bolster_power(),
                    }
                    .into(),
                ),
                no: Arc::new(
                    StateChange::DrawCombatCards {
                        player,
                        count: p.bolster_cards(),
                    }
                    .into(),
                ),
            }
            .into()];
            if built(Structure::Armory) {
                steps.push(StateChange::GainPower { player, amount: 1 }.into());
            }
            Action::maybe_pay(player, Cost::coins(1), Action::sequence(steps))
        }
        TopAction::Produce => {
            let mut steps = vec![Choice::ChooseProduceSpace {
                player,
                remaining: p.produce_spaces(),
                chosen: SmallVec::new(),
            }
            .into()];
            let mill = state.location(PieceKey::structure(p.faction, Structure::Mill));
            if let Some(space) = mill {
                steps.push(StateChange::ProduceOn { player, space, extra: 1 }.into());
            }
            Action::maybe_pay(player, produce_cost(state, player), Action::sequence(steps))
        }
    }
}

/// Produce grows more expensive as the workforce grows.
#[must_use]
pub fn produce_cost(state: &GameState, player: PlayerId) -> Cost {
    let workers = state.player(player).workers.len();
    let mut cost = Cost::FREE;
    if workers >= 4 {
        cost.power += 1;
    }
    if workers >= 6 {
        cost.popularity += 1;
    }
    if workers >= 8 {
        cost.coins += 1;
    }
    cost
}

/// The bottom-row action, its coin reward, and recruit bonuses for both
/// seats.
#[must_use]
pub fn bottom_action(state: &GameState, player: PlayerId, action: BottomAction) -> Action {
    let first: Action = match action {
        BottomAction::Upgrade => Choice::ChooseTopUpgrade { player }.into(),
        BottomAction::Deploy => Choice::ChooseMech { player }.into(),
        BottomAction::Build => Choice::ChooseStructure { player }.into(),
        BottomAction::Enlist => Choice::ChooseRecruit { player }.into(),
    };
    let steps = vec![
        first,
        StateChange::BottomReward { player, action }.into(),
        StateChange::RecruitBonuses { action }.into(),
    ];
    Action::maybe_pay(
        player,
        state.player(player).bottom_cost(action),
        Action::sequence(steps),
    )
}
