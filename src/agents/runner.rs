//! Play a game to the end with one agent per seat.

use crate::core::{PlayerMap, SearchError, Verbosity};
use crate::game::GameState;
use crate::rules::{apply_move, deciding_player};

use super::agent::Agent;

/// Drive `state` to completion, asking the deciding seat's agent for every
/// move. Returns the finished state.
pub fn run_game(
    mut state: GameState,
    agents: &mut PlayerMap<Box<dyn Agent>>,
    verbosity: Verbosity,
) -> Result<GameState, SearchError> {
    if verbosity.turns() {
        let seats: Vec<String> = agents
            .iter()
            .map(|(p, a)| format!("{} {} ({})", p, state.faction_of(p), a.name()))
            .collect();
        log::info!("new game: {}", seats.join(" vs "));
    }

    let mut moves = 0u64;
    while let Some(seat) = deciding_player(&state) {
        let mv = agents[seat].select_move(&state)?;
        state = apply_move(&state, mv, verbosity)?;
        moves += 1;
    }

    if verbosity.turns() {
        log::info!("game finished after {} moves and {} turns", moves, state.turn());
    }
    Ok(state)
}
