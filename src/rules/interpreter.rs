//! The action-stack interpreter.
//!
//! `apply_move` is the only way a game advances. It resolves the pending
//! choice on top of the stack with the supplied move, then drains:
//!
//! 1. state changes on top are popped and applied, in a loop;
//! 2. a `MaybePayCost` whose only option is to decline is declined;
//! 3. an empty stack ends the turn and queues the next `TakeTurn`, or
//!    finalises the game at the turn ceiling.
//!
//! It returns when a choice is on top or the game is over. A sixth star
//! surfaces as `Err(GameOver)` from any application; the remaining stack is
//! abandoned and the game is scored.
//!
//! The drain is a plain loop, so the depth of a chain of continuations never
//! touches the call stack.

use crate::actions::{Action, Choice};
use crate::core::{GameOver, Outcome, PlayerId, RulesError, Verbosity};
use crate::game::{Faction, GameMove, GameState};

use super::scoring::final_result;

/// Resolve the pending choice with `mv` and run until the next choice.
///
/// `mv` must be one of `legal_moves(state)`, or `None` exactly when that
/// list is empty.
pub fn apply_move(
    state: &GameState,
    mv: Option<GameMove>,
    verbosity: Verbosity,
) -> Result<GameState, RulesError> {
    let choice = pending_choice(state)?;
    let options = choice.legal_options(state);
    let legal = match mv {
        Some(m) => options.contains(&m),
        None => options.is_empty(),
    };
    if !legal {
        return Err(RulesError::IllegalMove {
            mv,
            action: choice.name(),
        });
    }

    if verbosity.actions() {
        log::debug!(
            "turn {} {}: {} -> {}",
            state.turn(),
            choice.chooser(),
            choice.name(),
            mv.map_or_else(|| "-".to_string(), |m| m.to_string())
        );
    }

    let choice = choice.clone();
    let mut next = state.clone();
    next.pop();
    Ok(settle(choice.apply(next, mv), verbosity))
}

/// Apply the null move while the pending choice has no options.
///
/// Returns a state that is either over or awaiting a real decision.
pub fn skip_empty_choices(
    mut state: GameState,
    verbosity: Verbosity,
) -> Result<GameState, RulesError> {
    while !state.is_over() && legal_moves(&state).is_empty() {
        state = apply_move(&state, None, verbosity)?;
    }
    Ok(state)
}

/// Drain from a state whose top may not be a choice.
///
/// Used after setup and by searches that build states by hand.
#[must_use]
pub fn advance(state: GameState, verbosity: Verbosity) -> GameState {
    if state.is_over() {
        return state;
    }
    drain(state, verbosity)
}

fn settle(outcome: Outcome, verbosity: Verbosity) -> GameState {
    match outcome {
        Ok(state) => drain(state, verbosity),
        Err(GameOver(state)) => finalize(*state, verbosity),
    }
}

enum Step {
    EndTurn,
    Change,
    Decline,
    Wait,
}

fn drain(mut state: GameState, verbosity: Verbosity) -> GameState {
    loop {
        let step = match state.top() {
            None => Step::EndTurn,
            Some(Action::Change(_)) => Step::Change,
            Some(Action::Choice(choice)) if declines_only(choice, &state) => Step::Decline,
            Some(Action::Choice(_)) => Step::Wait,
        };

        let outcome = match step {
            Step::Wait => return state,
            Step::EndTurn => {
                state = end_turn(state, verbosity);
                if state.is_over() {
                    return state;
                }
                continue;
            }
            Step::Change => match state.pop() {
                Some(Action::Change(change)) => {
                    if verbosity.actions() {
                        log::trace!("apply {}", change.name());
                    }
                    change.apply(state)
                }
                _ => continue,
            },
            Step::Decline => match state.pop() {
                Some(Action::Choice(choice)) => {
                    if verbosity.actions() {
                        log::trace!("decline {} for {}", choice.name(), choice.chooser());
                    }
                    choice.apply(state, Some(GameMove::Bool(false)))
                }
                _ => continue,
            },
        };

        state = match outcome {
            Ok(next) => next,
            Err(GameOver(last)) => return finalize(*last, verbosity),
        };
    }
}

/// A pay-gated action that cannot be paid for or would do nothing.
fn declines_only(choice: &Choice, state: &GameState) -> bool {
    matches!(choice, Choice::MaybePayCost { .. })
        && choice.legal_options(state) == [GameMove::Bool(false)]
}

fn end_turn(mut state: GameState, verbosity: Verbosity) -> GameState {
    state.advance_turn();
    if state.turn() >= state.config().turn_limit {
        if verbosity.turns() {
            log::info!("turn limit {} reached", state.config().turn_limit);
        }
        return finalize(state, verbosity);
    }
    let player = state.current();
    if verbosity.turns() {
        log::info!(
            "turn {}: {} ({})",
            state.turn(),
            player,
            state.faction_of(player)
        );
    }
    state.push(Choice::TakeTurn { player }.into());
    state
}

fn finalize(mut state: GameState, verbosity: Verbosity) -> GameState {
    let result = final_result(&state);
    if verbosity.turns() {
        let scores: Vec<String> = PlayerId::both()
            .map(|p| format!("{} {}", state.faction_of(p), result.scores[p]))
            .collect();
        let outcome = result
            .winner
            .map_or_else(|| "tie".to_string(), |f| format!("{f} wins"));
        log::info!(
            "game over on turn {}: {} ({})",
            state.turn(),
            outcome,
            scores.join(", ")
        );
    }
    state.set_result(result);
    state
}

/// The choice awaiting a move.
pub fn pending_choice(state: &GameState) -> Result<&Choice, RulesError> {
    if state.is_over() {
        return Err(RulesError::GameFinished);
    }
    match state.top() {
        None => Err(RulesError::NoPendingChoice),
        Some(Action::Choice(choice)) => Ok(choice),
        Some(Action::Change(change)) => Err(RulesError::NotAChoice(change.name())),
    }
}

/// Legal moves for the pending choice. Empty when the game is over, or
/// when the choice must be skipped with `None`.
#[must_use]
pub fn legal_moves(state: &GameState) -> Vec<GameMove> {
    pending_choice(state).map_or_else(|_| Vec::new(), |c| c.legal_options(state))
}

/// Seat that decides the pending choice.
#[must_use]
pub fn deciding_player(state: &GameState) -> Option<PlayerId> {
    pending_choice(state).ok().map(Choice::chooser)
}

#[must_use]
pub fn is_over(state: &GameState) -> bool {
    state.is_over()
}

#[must_use]
pub fn winner(state: &GameState) -> Option<Faction> {
    state.winner()
}
